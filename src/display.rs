use std::fs::File;
use std::io::Write;
use crate::derive::{ConflictEntry, CourseInfo, Selection};
use crate::session::Session;

/// Placeholder label shown for an unset slot
pub const EMPTY_OPTION_LABEL: &str = "Select a course";

/// Formats a course option: "code name (sections)"
pub fn format_course_option(course: &CourseInfo, sections: u32) -> String {
    format!("{} {} ({})", course.code, course.name, sections)
}

/// Formats one line of the conflict list: "id name"
pub fn format_student(entry: &ConflictEntry) -> String {
    format!("{} {}", entry.record.student_id, entry.record.student_name)
}

/// Heading over the conflict list
pub fn conflicts_heading(count: usize) -> String {
    format!("Students in all courses ({})", count)
}

fn describe_selection(selection: &Selection) -> String {
    selection
        .slots()
        .iter()
        .map(|code| if code.is_empty() { "-" } else { code.as_str() })
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Prints every course with its section estimate
pub fn print_catalog(session: &Session) {
    println!("\n=== Courses ({}) ===", session.catalog().len());
    for course in session.catalog() {
        println!(
            "  {}  [{} enrolled]",
            format_course_option(course, session.section_estimate(&course.code)),
            session.enrolled(&course.code)
        );
    }
}

/// Prints the conflict list for a selection
pub fn print_conflicts(selection: &Selection, conflicts: &[ConflictEntry]) {
    println!("\n=== {} ===", describe_selection(selection));
    println!("{}", conflicts_heading(conflicts.len()));
    for entry in conflicts {
        println!("  {}", format_student(entry));
    }
}

/// Writes the conflict list to a text file, one student per line
pub fn write_conflicts_to_file(
    selection: &Selection,
    conflicts: &[ConflictEntry],
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;

    writeln!(file, "** {} **", describe_selection(selection))?;
    writeln!(file, "{}", conflicts_heading(conflicts.len()))?;
    for entry in conflicts {
        writeln!(file, "{}", format_student(entry))?;
    }

    Ok(())
}
