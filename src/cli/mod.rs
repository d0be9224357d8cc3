//! Command-line parsing for the student math-score predictor.
//!
//! Argument parsing and command dispatch stay separate from the inference
//! code: this module only describes the surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{
    ArtifactPaths, Gender, Lunch, ParentalEducation, RaceEthnicity, TestPrep, SCORE_DEFAULT,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sperf", version, about = "Student Math-Score Predictor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict one math score from flags and print it.
    Predict(PredictArgs),
    /// Score a CSV of student records and optionally export the results.
    Batch(BatchArgs),
    /// Print metadata about the loaded artifacts.
    Show(ArtifactArgs),
    /// Launch the interactive form.
    ///
    /// This uses the same pipeline as `sperf predict`, but renders a
    /// terminal form with selectors and sliders.
    Tui(ArtifactArgs),
}

/// Artifact locations, shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct ArtifactArgs {
    /// Path to the serialized feature encoder.
    #[arg(long, default_value = "assets/encoder.json")]
    pub encoder: PathBuf,

    /// Path to the serialized regression model.
    #[arg(long, default_value = "assets/model.json")]
    pub model: PathBuf,
}

impl ArtifactArgs {
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            encoder: self.encoder.clone(),
            model: self.model.clone(),
        }
    }
}

/// Options for a one-shot prediction.
#[derive(Debug, Parser, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Student's gender.
    #[arg(long, value_enum, default_value_t = Gender::Female)]
    pub gender: Gender,

    /// Race/ethnicity group.
    #[arg(long, value_enum, default_value_t = RaceEthnicity::GroupA)]
    pub race_ethnicity: RaceEthnicity,

    /// Highest parental education level.
    #[arg(long, value_enum, default_value_t = ParentalEducation::SomeHighSchool)]
    pub parental_level_of_education: ParentalEducation,

    /// Lunch type.
    #[arg(long, value_enum, default_value_t = Lunch::Standard)]
    pub lunch: Lunch,

    /// Test preparation course status.
    #[arg(long, value_enum, default_value_t = TestPrep::None)]
    pub test_preparation_course: TestPrep,

    /// Reading score (0-100).
    #[arg(long, default_value_t = SCORE_DEFAULT, value_parser = clap::value_parser!(u8).range(..=100))]
    pub reading_score: u8,

    /// Writing score (0-100).
    #[arg(long, default_value_t = SCORE_DEFAULT, value_parser = clap::value_parser!(u8).range(..=100))]
    pub writing_score: u8,

    /// Also print per-feature contributions.
    #[arg(long)]
    pub explain: bool,
}

/// Options for batch CSV scoring.
#[derive(Debug, Parser, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Input CSV with the seven training-time columns.
    #[arg(long)]
    pub input: PathBuf,

    /// Write scored rows (inputs + predicted_math_score) to this CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_parses_training_time_labels() {
        let cli = Cli::try_parse_from([
            "sperf",
            "predict",
            "--gender",
            "female",
            "--race-ethnicity",
            "group B",
            "--parental-level-of-education",
            "bachelor's degree",
            "--lunch",
            "standard",
            "--test-preparation-course",
            "completed",
            "--reading-score",
            "72",
            "--writing-score",
            "74",
        ])
        .unwrap();

        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.race_ethnicity, RaceEthnicity::GroupB);
        assert_eq!(args.parental_level_of_education, ParentalEducation::BachelorsDegree);
        assert_eq!(args.reading_score, 72);
        assert!(!args.explain);
    }

    #[test]
    fn out_of_range_scores_are_rejected_at_parse_time() {
        let err = Cli::try_parse_from(["sperf", "predict", "--reading-score", "135"]);
        assert!(err.is_err());
    }

    #[test]
    fn artifact_paths_default_to_co_located_assets() {
        let cli = Cli::try_parse_from(["sperf", "show"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.encoder, PathBuf::from("assets/encoder.json"));
        assert_eq!(args.model, PathBuf::from("assets/model.json"));
    }
}
