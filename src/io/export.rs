//! Export scored batch rows to CSV.
//!
//! The export repeats the seven input columns and appends the predicted
//! score, so the file is self-contained for spreadsheets or downstream
//! scripts. Labels containing commas (none today) would need quoting; the
//! closed domains make that unnecessary.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::ScoredRecord;
use crate::error::AppError;

/// Write scored rows to a CSV file.
pub fn write_scored_csv(path: &Path, scored: &[ScoredRecord]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;
    write_scored(file, scored)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV: {e}")))
}

fn write_scored<W: Write>(mut out: W, scored: &[ScoredRecord]) -> std::io::Result<()> {
    writeln!(
        out,
        "gender,race_ethnicity,parental_level_of_education,lunch,test_preparation_course,reading_score,writing_score,predicted_math_score"
    )?;

    for s in scored {
        let r = &s.record;
        writeln!(
            out,
            "{},{},{},{},{},{},{},{:.2}",
            r.gender.display_name(),
            r.race_ethnicity.display_name(),
            r.parental_level_of_education.display_name(),
            r.lunch.display_name(),
            r.test_preparation_course.display_name(),
            r.reading_score,
            r.writing_score,
            s.score,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StudentRecord;

    #[test]
    fn export_has_header_and_two_decimal_scores() {
        let scored = vec![ScoredRecord {
            line: 2,
            record: StudentRecord::default(),
            score: 63.456,
        }];

        let mut buf = Vec::new();
        write_scored(&mut buf, &scored).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert!(lines.next().unwrap().ends_with("predicted_math_score"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("female,group A,some high school,standard,none,70,70,"));
        assert!(row.ends_with("63.46"));
    }
}
