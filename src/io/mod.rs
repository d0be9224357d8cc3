//! File input/output.
//!
//! - `artifact`: load and validate the two trained JSON artifacts
//! - `ingest`: batch CSV of student records, with row-level errors
//! - `export`: scored CSV output

pub mod artifact;
pub mod export;
pub mod ingest;
