//! Debug bundle writer for inspecting a single prediction end to end.

use std::fs::create_dir_all;
use std::path::PathBuf;

use chrono::Local;
use serde::Serialize;

use crate::app::pipeline::PipelineMeta;
use crate::domain::{Prediction, StudentRecord};
use crate::error::AppError;

/// Serialized tail of the bundle, for scripts that parse it back.
#[derive(Serialize)]
struct BundleSnapshot<'a> {
    record: &'a StudentRecord,
    prediction: &'a Prediction,
}

/// Write a markdown bundle (inputs, encoded slots, contributions, score)
/// under `debug/` and return its path.
pub fn write_debug_bundle(
    record: &StudentRecord,
    prediction: &Prediction,
    meta: &PipelineMeta,
) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("sperf_debug_{ts}.md"));

    let body = render_bundle(record, prediction, meta)?;
    std::fs::write(&path, body)
        .map_err(|e| AppError::new(4, format!("Failed to write debug bundle: {e}")))?;

    Ok(path)
}

fn render_bundle(
    record: &StudentRecord,
    prediction: &Prediction,
    meta: &PipelineMeta,
) -> Result<String, AppError> {
    let mut out = String::new();

    out.push_str("# sperf debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- model: {}\n", meta.model_name));
    out.push_str(&format!("- encoder_trained_at: {}\n", meta.encoder_trained_at));
    out.push_str(&format!("- model_trained_at: {}\n", meta.model_trained_at));
    out.push_str(&format!("- feature_count: {}\n", meta.feature_count));

    out.push_str("\n## Inputs\n");
    out.push_str("| column | value |\n");
    out.push_str("| - | - |\n");
    for (name, value) in record.fields() {
        out.push_str(&format!("| {name} | {value} |\n"));
    }

    out.push_str("\n## Encoded features\n");
    out.push_str("| slot | value | weight | contribution |\n");
    out.push_str("| - | - | - | - |\n");
    for c in &prediction.contributions {
        out.push_str(&format!(
            "| {} | {:.6} | {:.6} | {:.6} |\n",
            c.feature, c.value, c.weight, c.contribution
        ));
    }

    out.push_str(&format!("\n## Result\n- intercept: {:.6}\n", prediction.intercept));
    out.push_str(&format!("- predicted_math_score: {}\n", prediction.display_score()));

    let snapshot = serde_json::to_string_pretty(&BundleSnapshot { record, prediction })
        .map_err(|e| AppError::new(4, format!("Failed to serialize debug snapshot: {e}")))?;
    out.push_str("\n## Snapshot JSON\n```json\n");
    out.push_str(&snapshot);
    out.push_str("\n```\n");

    Ok(out)
}
