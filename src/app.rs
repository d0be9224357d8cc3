//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the two artifacts once
//! - dispatches to one-shot prediction, batch scoring, artifact inspection,
//!   or the interactive form

use clap::Parser;

use crate::cli::{BatchArgs, Command, PredictArgs};
use crate::domain::{ScoredRecord, StudentRecord};
use crate::error::AppError;

pub mod pipeline;

use pipeline::Pipeline;

/// Entry point for the `sperf` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `sperf` (and `sperf --encoder x.json`) to behave like
    // `sperf tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This keeps a clean clap structure while
    // letting the form be the default surface.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Predict(args) => handle_predict(args),
        Command::Batch(args) => handle_batch(args),
        Command::Show(args) => {
            let pipeline = Pipeline::load(&args.paths())?;
            println!("{}", crate::report::format_artifact_summary(&pipeline));
            Ok(())
        }
        Command::Tui(args) => crate::tui::run(&args.paths()),
    }
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let record = StudentRecord::new(
        args.gender,
        args.race_ethnicity,
        args.parental_level_of_education,
        args.lunch,
        args.test_preparation_course,
        args.reading_score,
        args.writing_score,
    )
    .map_err(|e| AppError::new(2, e))?;

    let pipeline = Pipeline::load(&args.artifacts.paths())?;
    let prediction = pipeline.predict(&record)?;

    print!("{}", crate::report::format_prediction(&record, &prediction));
    if args.explain {
        print!("{}", crate::report::format_contributions(&prediction));
    }

    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let pipeline = Pipeline::load(&args.artifacts.paths())?;
    let batch = crate::io::ingest::load_student_records(&args.input)?;

    let mut scored = Vec::with_capacity(batch.records.len());
    let mut row_errors = batch.row_errors.clone();

    for (line, record) in &batch.records {
        match pipeline.predict(record) {
            Ok(prediction) => scored.push(ScoredRecord {
                line: *line,
                record: *record,
                score: prediction.score,
            }),
            // A scoring failure takes out the row, not the run.
            Err(err) => row_errors.push(crate::io::ingest::RowError {
                line: *line,
                message: err.to_string(),
            }),
        }
    }
    row_errors.sort_by_key(|e| e.line);

    print!(
        "{}",
        crate::report::format_batch_summary(batch.rows_read, &scored, &row_errors)
    );

    if let Some(path) = &args.export {
        crate::io::export::write_scored_csv(path, &scored)?;
        println!("Wrote {} scored rows to '{}'.", scored.len(), path.display());
    }

    Ok(())
}

/// Rewrite argv so `sperf` defaults to `sperf tui`.
///
/// Rules:
/// - `sperf`                     -> `sperf tui`
/// - `sperf --encoder e.json`    -> `sperf tui --encoder e.json`
/// - `sperf --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "predict" | "batch" | "show" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["sperf"])), args(&["sperf", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(args(&["sperf", "--encoder", "e.json"])),
            args(&["sperf", "tui", "--encoder", "e.json"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["sperf", "predict", "--gender", "male"])),
            args(&["sperf", "predict", "--gender", "male"])
        );
        assert_eq!(rewrite_args(args(&["sperf", "--help"])), args(&["sperf", "--help"]));
    }
}
