use actix_web::{web, App, HttpServer, HttpResponse, Result, middleware};
use actix_web::cookie::Key;
use actix_files::Files;
use actix_session::{Session as BrowserSession, SessionMiddleware};
use actix_session::storage::CookieSessionStore;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

use crate::config::Config;
use crate::derive::{ConflictEntry, EnrollmentRecord, Selection};
use crate::display::format_course_option;
use crate::error::LoadError;
use crate::parser::read_enrollments;
use crate::session::Session;

const SELECTION_KEY: &str = "selection";

/// Enrollment data shared by every request. Selections live in each browser's cookie.
pub struct AppState {
    pub session: Mutex<Session>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        AppState { session: Mutex::new(session) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Session>> {
        self.session
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("enrollment state is poisoned"))
    }
}

#[derive(Serialize)]
pub struct CourseOption {
    code: String,
    name: String,
    enrolled: usize,
    sections: u32,
    label: String,
}

#[derive(Serialize)]
pub struct CoursesResponse {
    loaded_at: DateTime<Utc>,
    courses: Vec<CourseOption>,
}

#[derive(Deserialize)]
pub struct SlotChange {
    slot: usize,
    code: String,
}

#[derive(Serialize)]
pub struct ConflictStudent {
    index: usize,
    key: String,
    student_id: String,
    student_name: String,
    course_code: String,
    course_name: String,
}

impl From<ConflictEntry> for ConflictStudent {
    fn from(entry: ConflictEntry) -> Self {
        ConflictStudent {
            key: entry.render_key(),
            index: entry.index,
            student_id: entry.record.student_id,
            student_name: entry.record.student_name,
            course_code: entry.record.course_code,
            course_name: entry.record.course_name,
        }
    }
}

#[derive(Serialize)]
pub struct ConflictsResponse {
    selection: Selection,
    count: usize,
    students: Vec<ConflictStudent>,
}

fn current_selection(browser: &BrowserSession) -> Result<Selection> {
    Ok(browser.get::<Selection>(SELECTION_KEY)?.unwrap_or_default())
}

// Course list endpoint
async fn get_courses(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = state.lock()?;

    let courses = session
        .catalog()
        .iter()
        .map(|course| {
            let sections = session.section_estimate(&course.code);
            CourseOption {
                code: course.code.clone(),
                name: course.name.clone(),
                enrolled: session.enrolled(&course.code),
                sections,
                label: format_course_option(course, sections),
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(CoursesResponse {
        loaded_at: session.loaded_at(),
        courses,
    }))
}

// Selection endpoints
async fn get_selection(browser: BrowserSession) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(current_selection(&browser)?))
}

async fn set_selection(
    change: web::Json<SlotChange>,
    browser: BrowserSession,
) -> Result<HttpResponse> {
    let selection = current_selection(&browser)?;
    match selection.with_slot(change.slot, &change.code) {
        Ok(updated) => {
            browser.insert(SELECTION_KEY, &updated)?;
            Ok(HttpResponse::Ok().json(updated))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e.to_string()
        }))),
    }
}

// Conflict list endpoint
async fn get_conflicts(
    state: web::Data<AppState>,
    browser: BrowserSession,
) -> Result<HttpResponse> {
    let selection = current_selection(&browser)?;
    let students: Vec<ConflictStudent> = state
        .lock()?
        .conflicts_for(&selection)
        .into_iter()
        .map(ConflictStudent::from)
        .collect();

    Ok(HttpResponse::Ok().json(ConflictsResponse {
        selection,
        count: students.len(),
        students,
    }))
}

/// Parses an uploaded roster. An upload with no usable rows is refused so it
/// cannot wipe the loaded data.
fn parse_upload(body: &[u8]) -> std::result::Result<Vec<EnrollmentRecord>, LoadError> {
    let records = read_enrollments(body)?;
    if records.is_empty() {
        return Err(LoadError::NoRows);
    }
    Ok(records)
}

// CSV upload endpoint; replaces the enrollment list wholesale
async fn upload(body: web::Bytes, state: web::Data<AppState>) -> Result<HttpResponse> {
    match parse_upload(&body) {
        Ok(records) => {
            let count = records.len();
            state.lock()?.replace_records(records);
            info!("enrollment list replaced by upload ({} rows)", count);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "rows": count
            })))
        }
        Err(e) => {
            warn!("rejected enrollment upload: {}", e);
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to process CSV: {}", e)
            })))
        }
    }
}

// HTML page handler
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Registers every page and API route
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/courses", web::get().to(get_courses))
        .route("/api/selection", web::get().to(get_selection))
        .route("/api/selection", web::post().to(set_selection))
        .route("/api/conflicts", web::get().to(get_conflicts))
        .route("/api/upload", web::post().to(upload));
}

/// Body size limit for CSV uploads; actix's default is 256 KiB
pub fn upload_limit(limit: usize) -> web::PayloadConfig {
    web::PayloadConfig::new(limit)
}

/// Cookie-backed store for each browser's selection
pub fn selection_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

pub async fn start_server(config: &Config, session: Session) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(session));
    let key = Key::generate();
    let limit = config.upload_limit;

    info!("Access the site at http://{}:{}", config.bind, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(upload_limit(limit))
            .wrap(selection_middleware(key.clone()))
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .configure(routes)
    })
    .bind((config.bind.as_str(), config.port))?
    .run()
    .await
}
