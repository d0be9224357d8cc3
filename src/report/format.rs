//! Formatted terminal output for predictions and batch runs.

use crate::app::pipeline::Pipeline;
use crate::domain::{Prediction, ScoredRecord, StudentRecord};
use crate::io::ingest::RowError;

/// Format a single prediction: the echoed inputs and the score.
pub fn format_prediction(record: &StudentRecord, prediction: &Prediction) -> String {
    let mut out = String::new();

    out.push_str("=== sperf — Student Math-Score Predictor ===\n");
    for (name, value) in record.fields() {
        out.push_str(&format!("{name}: {value}\n"));
    }
    out.push_str(&format!(
        "\nPredicted math score: {}\n",
        prediction.display_score()
    ));

    out
}

/// Format per-feature contributions, largest magnitude first.
pub fn format_contributions(prediction: &Prediction) -> String {
    let mut rows = prediction.contributions.clone();
    rows.sort_by(|a, b| {
        b.contribution
            .abs()
            .partial_cmp(&a.contribution.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut out = String::new();
    out.push_str("\nContributions:\n");
    out.push_str(&format!("  {:<42} {:>8} {:>8} {:>8}\n", "feature", "value", "weight", "adds"));
    out.push_str(&format!(
        "  {:<42} {:>8} {:>8} {:>8.2}\n",
        "(intercept)", "", "", prediction.intercept
    ));
    for c in &rows {
        // Zero one-hot slots add nothing; keep the table readable.
        if c.value == 0.0 {
            continue;
        }
        out.push_str(&format!(
            "  {:<42} {:>8.3} {:>8.3} {:>+8.2}\n",
            c.feature, c.value, c.weight, c.contribution
        ));
    }

    out
}

/// Format the batch run summary: counts, row errors, score stats.
pub fn format_batch_summary(
    rows_read: usize,
    scored: &[ScoredRecord],
    row_errors: &[RowError],
) -> String {
    let mut out = String::new();

    out.push_str("=== sperf — Batch Scoring ===\n");
    out.push_str(&format!(
        "Rows: read={rows_read} | scored={} | failed={}\n",
        scored.len(),
        row_errors.len()
    ));

    if !scored.is_empty() {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for s in scored {
            min = min.min(s.score);
            max = max.max(s.score);
            sum += s.score;
        }
        let mean = sum / scored.len() as f64;
        out.push_str(&format!(
            "Predicted math score: min={min:.2} | mean={mean:.2} | max={max:.2}\n"
        ));
    }

    if !row_errors.is_empty() {
        out.push_str("\nSkipped rows:\n");
        for e in row_errors {
            out.push_str(&format!("  line {}: {}\n", e.line, e.message));
        }
    }

    out
}

/// Format artifact metadata for the `show` subcommand.
pub fn format_artifact_summary(pipeline: &Pipeline) -> String {
    let meta = pipeline.meta();
    let encoder = pipeline.encoder();
    let model = pipeline.model();

    let mut out = String::new();
    out.push_str("=== sperf — Loaded Artifacts ===\n");
    out.push_str(&format!("Model: {} (trained {})\n", meta.model_name, meta.model_trained_at));
    out.push_str(&format!("Encoder trained: {}\n", meta.encoder_trained_at));
    out.push_str(&format!(
        "Features: {} slots across {} columns\n",
        meta.feature_count,
        encoder.columns.len()
    ));

    out.push_str("\nEncoder columns:\n");
    for col in &encoder.columns {
        match col {
            crate::encode::ColumnSpec::Numeric { name, mean, std } => {
                out.push_str(&format!(
                    "  {name}: numeric, scaled with mean={mean:.3} std={std:.3}\n"
                ));
            }
            crate::encode::ColumnSpec::Categorical { name, categories } => {
                out.push_str(&format!(
                    "  {name}: one-hot over [{}]\n",
                    categories.join(", ")
                ));
            }
        }
    }

    out.push_str(&format!(
        "\nModel: intercept={:.4}, {} coefficients\n",
        model.intercept,
        model.input_len()
    ));

    out
}
