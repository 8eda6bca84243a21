use serde::{Deserialize, Serialize};
use crate::error::SelectionError;

/// Number of course slots a user can fill
pub const SLOT_COUNT: usize = 3;

/// One (course, student) pairing from the enrollment sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub course_code: String,
    pub course_name: String,
    pub student_id: String,
    pub student_name: String,
}

impl EnrollmentRecord {
    pub fn new(course_code: &str, course_name: &str, student_id: &str, student_name: &str) -> Self {
        EnrollmentRecord {
            course_code: course_code.to_string(),
            course_name: course_name.to_string(),
            student_id: student_id.to_string(),
            student_name: student_name.to_string(),
        }
    }

    /// Composite identity key: "course:student"
    pub fn key(&self) -> String {
        format!("{}:{}", self.course_code, self.student_id)
    }
}

/// A distinct course in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub code: String,
    pub name: String,
}

/// The three chosen course codes. An empty string means the slot is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection([String; SLOT_COUNT]);

impl Selection {
    pub fn new(first: &str, second: &str, third: &str) -> Self {
        Selection([first.to_string(), second.to_string(), third.to_string()])
    }

    pub fn slot(&self, idx: usize) -> &str {
        self.0.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn is_set(&self, idx: usize) -> bool {
        !self.slot(idx).is_empty()
    }

    pub fn slots(&self) -> &[String; SLOT_COUNT] {
        &self.0
    }

    /// Returns a new selection with one slot replaced; `self` is left untouched
    pub fn with_slot(&self, idx: usize, code: &str) -> Result<Selection, SelectionError> {
        if idx >= SLOT_COUNT {
            return Err(SelectionError::SlotOutOfRange(idx));
        }
        let mut slots = self.0.clone();
        slots[idx] = code.to_string();
        Ok(Selection(slots))
    }
}

/// A record in the conflict list, tagged with its position in the rendered list.
/// The index is for display only and plays no part in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictEntry {
    pub index: usize,
    pub record: EnrollmentRecord,
}

impl ConflictEntry {
    /// Render key, unique within one result list
    pub fn render_key(&self) -> String {
        format!("{}:{}", self.record.key(), self.index)
    }
}
