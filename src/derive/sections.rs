use std::collections::BTreeMap;
use super::catalog::CourseCounts;

/// Students per section for departments 55-59
pub const LARGE_SECTION_CAPACITY: u32 = 50;
/// Students per section for every other department
pub const DEFAULT_SECTION_CAPACITY: u32 = 36;

/// Parses the first two characters of a course code as a department number.
/// Returns None for short or non-numeric prefixes.
pub fn department_number(code: &str) -> Option<i32> {
    let prefix: String = code.chars().take(2).collect();
    prefix.parse().ok()
}

/// Section capacity assumed for a course code
pub fn section_capacity(code: &str) -> u32 {
    match department_number(code) {
        Some(55..=59) => LARGE_SECTION_CAPACITY,
        _ => DEFAULT_SECTION_CAPACITY,
    }
}

/// Estimated number of sections needed to seat `headcount` students, never less than 1
pub fn section_estimate(code: &str, headcount: usize) -> u32 {
    let sections = (headcount as f64 / section_capacity(code) as f64).round();
    (sections as u32).max(1)
}

/// Section estimates for every counted course
pub fn section_estimates(counts: &CourseCounts) -> BTreeMap<String, u32> {
    counts
        .iter()
        .map(|(code, count)| (code.to_string(), section_estimate(code, count)))
        .collect()
}
