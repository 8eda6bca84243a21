use std::collections::{HashMap, HashSet};
use super::types::{CourseInfo, EnrollmentRecord};

/// Headcount per course code, iterated in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseCounts {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl CourseCounts {
    pub fn get(&self, code: &str) -> Option<usize> {
        self.index.get(code).map(|&pos| self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(code, count)| (code.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn bump(&mut self, code: &str) {
        match self.index.get(code) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(code.to_string(), self.entries.len());
                self.entries.push((code.to_string(), 1));
            }
        }
    }
}

/// Counts how many enrollment rows each course has
pub fn course_counts(records: &[EnrollmentRecord]) -> CourseCounts {
    let mut counts = CourseCounts::default();
    for record in records {
        counts.bump(&record.course_code);
    }
    counts
}

/// Builds the distinct course list, sorted by code.
/// When a code appears with several names, the first one seen wins.
pub fn course_catalog(records: &[EnrollmentRecord]) -> Vec<CourseInfo> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut catalog = Vec::new();

    for record in records {
        if seen.insert(record.course_code.as_str()) {
            catalog.push(CourseInfo {
                code: record.course_code.clone(),
                name: record.course_name.clone(),
            });
        }
    }

    // Codes are unique here, so a stable sort is not needed
    catalog.sort_unstable_by(|a, b| a.code.cmp(&b.code));
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(code: &str, name: &str, sid: &str) -> EnrollmentRecord {
        EnrollmentRecord::new(code, name, sid, "")
    }

    #[test]
    fn counts_keep_first_seen_order() {
        let records = vec![
            rec("B200", "Bio", "1"),
            rec("A100", "Art", "1"),
            rec("B200", "Bio", "2"),
        ];
        let counts = course_counts(&records);
        let order: Vec<(&str, usize)> = counts.iter().collect();
        assert_eq!(order, vec![("B200", 2), ("A100", 1)]);
        assert_eq!(counts.get("B200"), Some(2));
        assert_eq!(counts.get("Z999"), None);
    }

    #[test]
    fn catalog_is_sorted_and_distinct() {
        let records = vec![
            rec("30101", "Chemistry", "1"),
            rec("10101", "English 9", "1"),
            rec("30101", "Chemistry", "2"),
            rec("20101", "Algebra", "3"),
        ];
        let catalog = course_catalog(&records);
        let codes: Vec<&str> = catalog.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["10101", "20101", "30101"]);
    }

    #[test]
    fn catalog_first_name_wins() {
        let records = vec![
            rec("10101", "English 9", "1"),
            rec("10101", "English IX", "2"),
        ];
        let catalog = course_catalog(&records);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "English 9");
    }

    #[test]
    fn empty_input_gives_empty_tables() {
        assert!(course_catalog(&[]).is_empty());
        assert!(course_counts(&[]).is_empty());
    }
}
