//! Course request conflict finder: loads course enrollments from a
//! spreadsheet export and lists the students enrolled in every chosen course.

pub mod config;
pub mod derive;
pub mod display;
pub mod error;
pub mod export;
pub mod parser;
pub mod session;
pub mod web;

pub use config::Config;
pub use derive::{ConflictEntry, ConflictPolicy, CourseInfo, EnrollmentRecord, Selection};
pub use session::Session;
