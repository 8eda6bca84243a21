use std::collections::BTreeMap;
use chrono::{DateTime, Utc};

use crate::derive::{
    course_catalog, course_counts, find_conflicts, section_estimates, ConflictEntry, ConflictPolicy,
    CourseCounts, CourseInfo, EnrollmentRecord, Selection,
};
use crate::error::SelectionError;

/// Enrollment data loaded for one session, with the tables derived from it.
/// The record list is only ever replaced as a whole.
#[derive(Debug, Clone)]
pub struct Session {
    records: Vec<EnrollmentRecord>,
    counts: CourseCounts,
    estimates: BTreeMap<String, u32>,
    catalog: Vec<CourseInfo>,
    selection: Selection,
    policy: ConflictPolicy,
    loaded_at: DateTime<Utc>,
}

impl Session {
    pub fn new(records: Vec<EnrollmentRecord>) -> Self {
        Self::with_policy(records, ConflictPolicy::default())
    }

    pub fn with_policy(records: Vec<EnrollmentRecord>, policy: ConflictPolicy) -> Self {
        let counts = course_counts(&records);
        let estimates = section_estimates(&counts);
        let catalog = course_catalog(&records);
        Session {
            records,
            counts,
            estimates,
            catalog,
            selection: Selection::default(),
            policy,
            loaded_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Swaps in a freshly loaded record list and rebuilds every derived table.
    /// The current selection is kept.
    pub fn replace_records(&mut self, records: Vec<EnrollmentRecord>) {
        let selection = std::mem::take(&mut self.selection);
        *self = Session {
            selection,
            ..Self::with_policy(records, self.policy)
        };
    }

    pub fn records(&self) -> &[EnrollmentRecord] {
        &self.records
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Distinct courses sorted by code
    pub fn catalog(&self) -> &[CourseInfo] {
        &self.catalog
    }

    /// Raw number of enrollment rows for a course
    pub fn enrolled(&self, code: &str) -> usize {
        self.counts.get(code).unwrap_or(0)
    }

    /// Estimated sections for a course; unknown courses report 1
    pub fn section_estimate(&self, code: &str) -> u32 {
        self.estimates.get(code).copied().unwrap_or(1)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replaces one slot of the selection
    pub fn set_slot(&mut self, slot: usize, code: &str) -> Result<&Selection, SelectionError> {
        self.selection = self.selection.with_slot(slot, code)?;
        Ok(&self.selection)
    }

    /// Conflict list for the session's own selection
    pub fn conflicts(&self) -> Vec<ConflictEntry> {
        self.conflicts_for(&self.selection)
    }

    /// Conflict list for a selection held elsewhere (e.g. per browser)
    pub fn conflicts_for(&self, selection: &Selection) -> Vec<ConflictEntry> {
        find_conflicts(&self.records, selection, self.policy)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::empty()
    }
}
