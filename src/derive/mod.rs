pub mod types;
pub mod catalog;
pub mod sections;
pub mod conflicts;

pub use types::{ConflictEntry, CourseInfo, EnrollmentRecord, Selection, SLOT_COUNT};
pub use catalog::{course_catalog, course_counts, CourseCounts};
pub use sections::{section_estimate, section_estimates};
pub use conflicts::{find_conflicts, ConflictPolicy};
