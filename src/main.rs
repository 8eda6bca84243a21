use std::path::{Path, PathBuf};
use log::info;

use course_conflicts::config::{parse_port, Config};
use course_conflicts::display::{print_catalog, print_conflicts, write_conflicts_to_file};
use course_conflicts::export::export_conflicts_to_csv;
use course_conflicts::parser::load_or_empty;
use course_conflicts::{web, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = Config::from_env()?;

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        if let Some(port) = args.get(2) {
            config.port = parse_port(port)?;
        }

        let session = Session::with_policy(load_or_empty(&config.csv_path), config.policy);
        info!("Starting web server on port {}...", config.port);
        web::start_server(&config, session).await?;
        return Ok(());
    }

    // CLI mode: [CSV] [COURSE] [COURSE] [COURSE]
    if let Some(path) = args.get(1) {
        config.csv_path = PathBuf::from(path);
    }

    info!("Loading enrollments from {}", config.csv_path.display());
    let mut session = Session::with_policy(load_or_empty(&config.csv_path), config.policy);
    info!(
        "Loaded {} enrollment rows at {}",
        session.records().len(),
        session.loaded_at().format("%Y-%m-%d %H:%M:%S UTC")
    );

    print_catalog(&session);

    let codes: Vec<&String> = args.iter().skip(2).take(3).collect();
    if codes.is_empty() {
        return Ok(());
    }
    for (slot, code) in codes.iter().enumerate() {
        session.set_slot(slot, code)?;
    }

    let conflicts = session.conflicts();
    print_conflicts(session.selection(), &conflicts);

    write_conflicts_to_file(session.selection(), &conflicts, "conflicts.txt")?;
    export_conflicts_to_csv(&conflicts, Path::new("conflicts.csv"))?;
    println!("\nConflict list saved to:");
    println!("  - conflicts.txt");
    println!("  - conflicts.csv");

    Ok(())
}
