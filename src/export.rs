use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;
use std::fs::File;

use crate::derive::ConflictEntry;

const HEADER: [&str; 5] = ["#", "Student #", "Student Name", "Course #", "Course Name"];

/// Writes the conflict list as CSV to any writer, header first
pub fn write_conflicts_csv<W: Write>(conflicts: &[ConflictEntry], writer: W) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for entry in conflicts {
        let position = (entry.index + 1).to_string();
        wtr.write_record([
            position.as_str(),
            entry.record.student_id.as_str(),
            entry.record.student_name.as_str(),
            entry.record.course_code.as_str(),
            entry.record.course_name.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the conflict list to a CSV file, replacing any existing file
pub fn export_conflicts_to_csv(
    conflicts: &[ConflictEntry],
    csv_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(csv_path)?;
    write_conflicts_csv(conflicts, file)?;
    Ok(())
}
