use std::collections::HashSet;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;
use super::types::{ConflictEntry, EnrollmentRecord, Selection, SLOT_COUNT};

/// How the selected slots are combined into a conflict list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Slots 0 and 1 must both be set. Rows come from slot 1's course,
    /// narrowed by slot 0 and then by slot 2 (an empty slot 2 matches everyone).
    #[default]
    Reference,
    /// Intersection of every non-empty slot, in any position. Needs at least
    /// two set slots; rows come from the last set slot's course.
    AllSelected,
}

impl FromStr for ConflictPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reference" => Ok(ConflictPolicy::Reference),
            "all-selected" | "all_selected" => Ok(ConflictPolicy::AllSelected),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Rows matching a slot: the slot's course, or every row when the slot is empty
fn slot_candidates<'a>(records: &'a [EnrollmentRecord], code: &'a str) -> impl Iterator<Item = &'a EnrollmentRecord> {
    records
        .iter()
        .filter(move |r| code.is_empty() || r.course_code == code)
}

fn student_ids<'a>(records: &'a [EnrollmentRecord], code: &'a str) -> HashSet<&'a str> {
    slot_candidates(records, code)
        .map(|r| r.student_id.as_str())
        .collect()
}

fn tag(rows: Vec<&EnrollmentRecord>) -> Vec<ConflictEntry> {
    rows.into_iter()
        .enumerate()
        .map(|(index, record)| ConflictEntry { index, record: record.clone() })
        .collect()
}

/// Students enrolled in every selected course, according to `policy`
pub fn find_conflicts(
    records: &[EnrollmentRecord],
    selection: &Selection,
    policy: ConflictPolicy,
) -> Vec<ConflictEntry> {
    match policy {
        ConflictPolicy::Reference => reference_conflicts(records, selection),
        ConflictPolicy::AllSelected => all_selected_conflicts(records, selection),
    }
}

fn reference_conflicts(records: &[EnrollmentRecord], selection: &Selection) -> Vec<ConflictEntry> {
    if !selection.is_set(0) || !selection.is_set(1) {
        return Vec::new();
    }

    let first_ids = student_ids(records, selection.slot(0));
    let third_ids = student_ids(records, selection.slot(2));

    let rows: Vec<&EnrollmentRecord> = slot_candidates(records, selection.slot(1))
        .filter(|r| first_ids.contains(r.student_id.as_str()))
        .filter(|r| third_ids.contains(r.student_id.as_str()))
        .collect();

    tag(rows)
}

fn all_selected_conflicts(records: &[EnrollmentRecord], selection: &Selection) -> Vec<ConflictEntry> {
    let chosen: Vec<&str> = (0..SLOT_COUNT)
        .map(|idx| selection.slot(idx))
        .filter(|code| !code.is_empty())
        .collect();

    let Some((&source, others)) = chosen.split_last() else {
        return Vec::new();
    };
    if others.is_empty() {
        return Vec::new();
    }

    let id_sets: Vec<HashSet<&str>> = others
        .iter()
        .map(|code| student_ids(records, code))
        .collect();

    let rows: Vec<&EnrollmentRecord> = slot_candidates(records, source)
        .filter(|r| id_sets.iter().all(|ids| ids.contains(r.student_id.as_str())))
        .collect();

    tag(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<EnrollmentRecord> {
        vec![
            EnrollmentRecord::new("A", "Course A", "s1", "Ada"),
            EnrollmentRecord::new("B", "Course B", "s1", "Ada"),
            EnrollmentRecord::new("C", "Course C", "s1", "Ada"),
            EnrollmentRecord::new("A", "Course A", "s2", "Ben"),
            EnrollmentRecord::new("B", "Course B", "s2", "Ben"),
        ]
    }

    fn ids(entries: &[ConflictEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.record.student_id.as_str()).collect()
    }

    #[test]
    fn three_courses_narrow_to_common_students() {
        let result = find_conflicts(&roster(), &Selection::new("A", "B", "C"), ConflictPolicy::Reference);
        assert_eq!(ids(&result), vec!["s1"]);
        assert_eq!(result[0].record.course_code, "B");
    }

    #[test]
    fn empty_third_slot_matches_everyone() {
        let result = find_conflicts(&roster(), &Selection::new("A", "B", ""), ConflictPolicy::Reference);
        assert_eq!(ids(&result), vec!["s1", "s2"]);
        assert!(result.iter().all(|e| e.record.course_code == "B"));
        let indices: Vec<usize> = result.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn reference_needs_first_two_slots() {
        let records = roster();
        for selection in [
            Selection::new("", "B", ""),
            Selection::new("A", "", ""),
            Selection::new("", "B", "C"),
            Selection::new("A", "", "C"),
            Selection::default(),
        ] {
            assert!(find_conflicts(&records, &selection, ConflictPolicy::Reference).is_empty());
        }
    }

    #[test]
    fn duplicate_slots_are_not_collapsed() {
        let result = find_conflicts(&roster(), &Selection::new("A", "A", ""), ConflictPolicy::Reference);
        assert_eq!(ids(&result), vec!["s1", "s2"]);
        assert!(result.iter().all(|e| e.record.course_code == "A"));
    }

    #[test]
    fn duplicate_rows_in_second_course_are_all_kept() {
        let records = vec![
            EnrollmentRecord::new("A", "Course A", "s1", "Ada"),
            EnrollmentRecord::new("B", "Course B", "s1", "Ada"),
            EnrollmentRecord::new("B", "Course B", "s1", "Ada"),
        ];
        let result = find_conflicts(&records, &Selection::new("A", "B", ""), ConflictPolicy::Reference);
        assert_eq!(ids(&result), vec!["s1", "s1"]);
        let indices: Vec<usize> = result.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_ne!(result[0].render_key(), result[1].render_key());
    }

    #[test]
    fn unknown_course_yields_nothing() {
        let result = find_conflicts(&roster(), &Selection::new("A", "Z", ""), ConflictPolicy::Reference);
        assert!(result.is_empty());
    }

    #[test]
    fn all_selected_accepts_any_two_slots() {
        let records = roster();
        let result = find_conflicts(&records, &Selection::new("A", "", "C"), ConflictPolicy::AllSelected);
        assert_eq!(ids(&result), vec!["s1"]);
        assert_eq!(result[0].record.course_code, "C");

        let result = find_conflicts(&records, &Selection::new("", "B", ""), ConflictPolicy::AllSelected);
        assert!(result.is_empty());
    }

    #[test]
    fn all_selected_agrees_with_reference_when_first_two_set() {
        let records = roster();
        for selection in [Selection::new("A", "B", ""), Selection::new("A", "B", "C")] {
            let reference = ids(&find_conflicts(&records, &selection, ConflictPolicy::Reference))
                .into_iter()
                .map(str::to_string)
                .collect::<HashSet<_>>();
            let symmetric = ids(&find_conflicts(&records, &selection, ConflictPolicy::AllSelected))
                .into_iter()
                .map(str::to_string)
                .collect::<HashSet<_>>();
            assert_eq!(reference, symmetric);
        }
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("reference".parse::<ConflictPolicy>(), Ok(ConflictPolicy::Reference));
        assert_eq!("All-Selected".parse::<ConflictPolicy>(), Ok(ConflictPolicy::AllSelected));
        assert!("fuzzy".parse::<ConflictPolicy>().is_err());
    }
}
