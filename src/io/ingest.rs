//! Batch CSV ingest.
//!
//! Turns a CSV of student rows into validated `StudentRecord`s using the
//! seven training-time column names as a strict header schema.
//!
//! Design goals (same as the interactive path):
//! - clear errors for missing columns (exit code 2)
//! - row-level validation: bad rows are skipped but reported with their line
//! - deterministic behavior, no fitting or scoring logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{
    parse_label, Gender, Lunch, ParentalEducation, RaceEthnicity, StudentRecord, TestPrep,
    FIELD_NAMES, SCORE_MAX,
};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based line number in the CSV (header is line 1).
    pub line: usize,
    pub message: String,
}

/// Ingest output: validated records plus what went wrong.
#[derive(Debug, Clone)]
pub struct BatchData {
    /// `(line, record)` pairs for rows that validated.
    pub records: Vec<(usize, StudentRecord)>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load student records from a CSV file.
pub fn load_student_records(path: &Path) -> Result<BatchData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open batch CSV '{}': {e}", path.display()),
        )
    })?;
    read_student_records(file)
}

/// Read student records from any reader (the file-free path used by tests).
pub fn read_student_records<R: Read>(reader: R) -> Result<BatchData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, row) in reader.records().enumerate() {
        // Header occupies line 1.
        let line = idx + 2;
        rows_read += 1;

        let row = match row {
            Ok(row) => row,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("Unparseable CSV row: {e}"),
                });
                continue;
            }
        };

        match parse_row(&row, &header_map) {
            Ok(record) => records.push((line, record)),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    Ok(BatchData {
        records,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = FIELD_NAMES
        .iter()
        .copied()
        .filter(|name| !header_map.contains_key(*name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::new(
            2,
            format!("Batch CSV is missing required column(s): {}", missing.join(", ")),
        ))
    }
}

fn parse_row(row: &StringRecord, header_map: &HashMap<String, usize>) -> Result<StudentRecord, String> {
    let gender = parse_enum(row, header_map, "gender", &Gender::ALL, Gender::display_name)?;
    let race = parse_enum(
        row,
        header_map,
        "race_ethnicity",
        &RaceEthnicity::ALL,
        RaceEthnicity::display_name,
    )?;
    let parental = parse_enum(
        row,
        header_map,
        "parental_level_of_education",
        &ParentalEducation::ALL,
        ParentalEducation::display_name,
    )?;
    let lunch = parse_enum(row, header_map, "lunch", &Lunch::ALL, Lunch::display_name)?;
    let prep = parse_enum(
        row,
        header_map,
        "test_preparation_course",
        &TestPrep::ALL,
        TestPrep::display_name,
    )?;

    let reading = parse_score(row, header_map, "reading_score")?;
    let writing = parse_score(row, header_map, "writing_score")?;

    StudentRecord::new(gender, race, parental, lunch, prep, reading, writing)
}

fn parse_enum<T: Copy>(
    row: &StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
    all: &[T],
    display: impl Fn(T) -> &'static str,
) -> Result<T, String> {
    let raw = get_required(row, header_map, name)?;
    parse_label(all, raw, display).ok_or_else(|| format!("Unknown `{name}` label: '{raw}'"))
}

fn parse_score(
    row: &StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<u8, String> {
    let raw = get_required(row, header_map, name)?;
    let value: i64 = raw
        .parse()
        .map_err(|_| format!("Invalid `{name}` '{raw}' (expected an integer)."))?;
    if !(0..=i64::from(SCORE_MAX)).contains(&value) {
        return Err(format!("Invalid `{name}` {value} (must be 0..={SCORE_MAX})."));
    }
    Ok(value as u8)
}

fn get_required<'a>(
    row: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    row.get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}
