use csv::{ByteRecord, ReaderBuilder, Trim};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use log::{debug, error, info, warn};

use crate::derive::EnrollmentRecord;
use crate::error::LoadError;

/// Column positions of the four enrollment fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    course_code: usize,
    course_name: usize,
    student_id: usize,
    student_name: usize,
}

impl Columns {
    /// Finds columns by the spreadsheet's header names. A field whose header
    /// is missing takes its positional default (0-3), or the first column no
    /// other field has claimed when that default is taken.
    fn locate(headers: &[String]) -> Self {
        const NEEDLES: [&str; 4] = ["course #", "course name", "student #", "student name"];

        let mut found: [Option<usize>; 4] = NEEDLES.map(|needle| {
            headers
                .iter()
                .position(|h| h.trim().to_lowercase().contains(needle))
        });

        for field in 0..NEEDLES.len() {
            if found[field].is_some() {
                continue;
            }
            let claimed: HashSet<usize> = found.iter().flatten().copied().collect();
            let column = if claimed.contains(&field) {
                (0..).find(|idx| !claimed.contains(idx)).unwrap_or(field)
            } else {
                field
            };
            warn!(
                "no {:?} header found, using column {}",
                NEEDLES[field], column
            );
            found[field] = Some(column);
        }

        let [course_code, course_name, student_id, student_name] = found.map(|c| c.unwrap_or(0));
        Columns { course_code, course_name, student_id, student_name }
    }

    fn widest(&self) -> usize {
        self.course_code
            .max(self.course_name)
            .max(self.student_id)
            .max(self.student_name)
    }
}

/// Decodes a field, replacing bytes that are not UTF-8 (e.g. Latin-1 accents)
fn decode(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// Reads enrollment rows from any CSV source, keeping source order
pub fn read_enrollments<R: Read>(source: R) -> Result<Vec<EnrollmentRecord>, LoadError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    let headers: Vec<String> = reader.byte_headers()?.iter().map(decode).collect();
    let columns = Columns::locate(&headers);
    debug!("enrollment columns: {:?}", columns);

    let mut records = Vec::new();
    let mut keys: HashSet<String> = HashSet::new();
    let mut duplicates = 0usize;
    let mut skipped = 0usize;

    let mut row = ByteRecord::new();
    while reader.read_byte_record(&mut row)? {
        if row.len() <= columns.widest() {
            skipped += 1;
            continue; // Skip incomplete rows
        }

        let field = |idx: usize| row.get(idx).map(decode).unwrap_or_default();
        let record = EnrollmentRecord {
            course_code: field(columns.course_code),
            course_name: field(columns.course_name),
            student_id: field(columns.student_id),
            student_name: field(columns.student_name),
        };

        // Rows without a course or student cannot form an identity key
        if record.course_code.is_empty() || record.student_id.is_empty() {
            skipped += 1;
            continue;
        }

        if !keys.insert(record.key()) {
            duplicates += 1;
        }
        records.push(record);
    }

    if skipped > 0 {
        debug!("skipped {} incomplete enrollment rows", skipped);
    }
    if duplicates > 0 {
        warn!("{} enrollment rows repeat an existing course:student pair", duplicates);
    }

    Ok(records)
}

/// Loads enrollments from a CSV file exported from the enrollment sheet
pub fn load_enrollments<P: AsRef<Path>>(csv_path: P) -> Result<Vec<EnrollmentRecord>, LoadError> {
    let file = File::open(csv_path.as_ref())?;
    let records = read_enrollments(file)?;
    info!(
        "loaded {} enrollment rows from {}",
        records.len(),
        csv_path.as_ref().display()
    );
    Ok(records)
}

/// Loads enrollments, leaving the list empty if anything goes wrong
pub fn load_or_empty<P: AsRef<Path>>(csv_path: P) -> Vec<EnrollmentRecord> {
    match load_enrollments(&csv_path) {
        Ok(records) => records,
        Err(e) => {
            error!("could not load {}: {}", csv_path.as_ref().display(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_columns_by_header_name() {
        let csv = "Student Name,Student #,Course Name,Course #\n\
                   Ada Lovelace,1001,Algebra II,20201\n";
        let records = read_enrollments(csv.as_bytes()).unwrap();
        assert_eq!(records, vec![EnrollmentRecord::new("20201", "Algebra II", "1001", "Ada Lovelace")]);
    }

    #[test]
    fn falls_back_to_positional_columns() {
        let csv = "code,title,id,name\n10101,English 9,1001,Ada\n";
        let records = read_enrollments(csv.as_bytes()).unwrap();
        assert_eq!(records[0].course_code, "10101");
        assert_eq!(records[0].student_name, "Ada");
    }

    #[test]
    fn skips_short_and_keyless_rows() {
        let csv = "Course #,Course Name,Student #,Student Name\n\
                   10101,English 9\n\
                   ,English 9,1001,Ada\n\
                   10101,English 9,,Ada\n\
                   10101, English 9 , 1002 ,Ben\n";
        let records = read_enrollments(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].course_name, "English 9");
        assert_eq!(records[0].student_id, "1002");
    }

    #[test]
    fn keeps_duplicate_keys_in_order() {
        let csv = "Course #,Course Name,Student #,Student Name\n\
                   10101,English 9,1001,Ada\n\
                   10101,English 9,1001,Ada\n";
        let records = read_enrollments(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn missing_file_loads_as_empty() {
        assert!(load_or_empty("does/not/exist.csv").is_empty());
        assert!(matches!(load_enrollments("does/not/exist.csv"), Err(LoadError::Io(_))));
    }

    #[test]
    fn latin1_bytes_do_not_drop_the_roster() {
        let mut csv = b"Course #,Course Name,Student #,Student Name\n10101,English 9,1001,Ada\n".to_vec();
        csv.extend_from_slice(b"10101,English 9,1002,Zo\xeb\n");
        csv.extend_from_slice(b"20201,Algebra II,1003,Ben\n");

        let records = read_enrollments(&csv[..]).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].student_id, "1002");
        assert_eq!(records[1].student_name, "Zo\u{FFFD}");
        assert_eq!(records[2].course_code, "20201");
    }

    #[test]
    fn fallback_skips_columns_claimed_by_headers() {
        let headers: Vec<String> = ["x", "Student #", "y", "z"].iter().map(|h| h.to_string()).collect();
        let columns = Columns::locate(&headers);
        assert_eq!(columns.student_id, 1);
        assert_eq!(columns.course_code, 0);
        assert_eq!(columns.course_name, 2);
        assert_eq!(columns.student_name, 3);

        let csv = "x,Student #,y,z\n10101,1001,English 9,Ada\n";
        let records = read_enrollments(csv.as_bytes()).unwrap();
        assert_eq!(records, vec![EnrollmentRecord::new("10101", "English 9", "1001", "Ada")]);
    }
}
