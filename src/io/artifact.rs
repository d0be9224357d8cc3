//! Read and validate the trained artifacts.
//!
//! Both artifacts are JSON files with a small metadata envelope (tool tag,
//! schema version, training date) around the fitted parameters. Two failure
//! classes are kept distinct, because they tell the user different things:
//!
//! - exit 2: the file is missing or unreadable — fix the path
//! - exit 3: the file parsed but cannot encode/predict — re-export the
//!   artifact
//!
//! Either way startup halts; the app never runs with a partial pipeline.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::encode::FeatureEncoder;
use crate::error::AppError;
use crate::models::LinearModel;

/// Expected `tool` tag in artifact envelopes.
pub const TOOL_TAG: &str = "sperf";

/// Current artifact schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Serialized feature encoder artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderFile {
    pub tool: String,
    pub schema_version: u32,
    pub trained_at: NaiveDate,
    #[serde(flatten)]
    pub encoder: FeatureEncoder,
}

/// Serialized regression model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub schema_version: u32,
    pub trained_at: NaiveDate,
    #[serde(flatten)]
    pub model: LinearModel,
}

/// Read the encoder artifact and verify it can encode.
pub fn read_encoder_json(path: &Path) -> Result<EncoderFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open encoder artifact '{}': {e}", path.display()),
        )
    })?;

    let parsed: EncoderFile = serde_json::from_reader(file).map_err(|e| {
        AppError::new(
            3,
            format!("Malformed encoder artifact '{}': {e}", path.display()),
        )
    })?;

    check_envelope(path, "encoder", &parsed.tool, parsed.schema_version)?;

    parsed.encoder.validate().map_err(|e| {
        AppError::new(
            3,
            format!("Encoder artifact '{}' cannot encode: {e}", path.display()),
        )
    })?;

    Ok(parsed)
}

/// Read the model artifact and verify it can predict.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open model artifact '{}': {e}", path.display()),
        )
    })?;

    let parsed: ModelFile = serde_json::from_reader(file).map_err(|e| {
        AppError::new(
            3,
            format!("Malformed model artifact '{}': {e}", path.display()),
        )
    })?;

    check_envelope(path, "model", &parsed.tool, parsed.schema_version)?;

    parsed.model.validate().map_err(|e| {
        AppError::new(
            3,
            format!("Model artifact '{}' cannot predict: {e}", path.display()),
        )
    })?;

    Ok(parsed)
}

fn check_envelope(path: &Path, what: &str, tool: &str, version: u32) -> Result<(), AppError> {
    if tool != TOOL_TAG {
        return Err(AppError::new(
            3,
            format!(
                "{what} artifact '{}' was written by `{tool}`, expected `{TOOL_TAG}`",
                path.display()
            ),
        ));
    }
    if version != SCHEMA_VERSION {
        return Err(AppError::new(
            3,
            format!(
                "{what} artifact '{}' has schema version {version}, expected {SCHEMA_VERSION}",
                path.display()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sperf_artifact_test_{}_{name}", std::process::id()))
    }

    #[test]
    fn missing_file_names_the_file_with_exit_2() {
        let path = PathBuf::from("/nonexistent/encoder.json");
        let err = read_encoder_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("encoder.json"), "{err}");
    }

    #[test]
    fn malformed_json_is_distinct_from_missing_file() {
        let path = temp_path("garbage.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_encoder_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("Malformed"), "{err}");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn parsed_but_incapable_encoder_is_rejected() {
        let path = temp_path("empty_encoder.json");
        std::fs::write(
            &path,
            r#"{"tool":"sperf","schema_version":1,"trained_at":"2026-05-18","columns":[]}"#,
        )
        .unwrap();

        let err = read_encoder_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("cannot encode"), "{err}");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn wrong_schema_version_is_rejected() {
        let path = temp_path("old_model.json");
        std::fs::write(
            &path,
            r#"{"tool":"sperf","schema_version":99,"trained_at":"2026-05-18","name":"linear_regression","intercept":0.0,"coefficients":[1.0]}"#,
        )
        .unwrap();

        let err = read_model_json(&path).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("schema version 99"), "{err}");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn valid_model_round_trips() {
        let path = temp_path("ok_model.json");
        std::fs::write(
            &path,
            r#"{"tool":"sperf","schema_version":1,"trained_at":"2026-05-18","name":"linear_regression","intercept":66.39,"coefficients":[1.0,2.0]}"#,
        )
        .unwrap();

        let parsed = read_model_json(&path).unwrap();
        assert_eq!(parsed.model.input_len(), 2);
        assert!((parsed.model.intercept - 66.39).abs() < 1e-12);

        let _ = std::fs::remove_file(&path);
    }
}
