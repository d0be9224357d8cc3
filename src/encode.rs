//! Feature encoder: the fitted column transformer.
//!
//! The encoder artifact declares an ordered list of column specs. Numeric
//! columns carry fitted standard-scaler parameters; categorical columns carry
//! the fitted one-hot vocabulary. Encoding a record concatenates the slots in
//! artifact order into one fixed-length vector — the private contract between
//! encoder and model.
//!
//! No fitting happens here: the parameters were trained offline and are
//! loaded read-only at startup.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::domain::{FieldValue, StudentRecord, FIELD_NAMES};

/// One fitted column of the transformer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnSpec {
    /// Standard-scaled numeric column: slot value is `(x - mean) / std`.
    Numeric { name: String, mean: f64, std: f64 },
    /// One-hot categorical column: one slot per category, no dropped baseline.
    Categorical { name: String, categories: Vec<String> },
}

impl ColumnSpec {
    pub fn name(&self) -> &str {
        match self {
            ColumnSpec::Numeric { name, .. } => name,
            ColumnSpec::Categorical { name, .. } => name,
        }
    }

    /// Number of vector slots this column occupies.
    pub fn width(&self) -> usize {
        match self {
            ColumnSpec::Numeric { .. } => 1,
            ColumnSpec::Categorical { categories, .. } => categories.len(),
        }
    }
}

/// The fitted column transformer, in artifact column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureEncoder {
    pub columns: Vec<ColumnSpec>,
}

/// The two numeric training-time columns.
const NUMERIC_FIELDS: [&str; 2] = ["reading_score", "writing_score"];

impl FeatureEncoder {
    /// Total width of the encoded vector.
    pub fn output_len(&self) -> usize {
        self.columns.iter().map(ColumnSpec::width).sum()
    }

    /// Human-readable label per encoded slot, e.g. `lunch=standard` or
    /// `reading_score`. Used for contribution reporting and debug bundles.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.output_len());
        for col in &self.columns {
            match col {
                ColumnSpec::Numeric { name, .. } => names.push(name.clone()),
                ColumnSpec::Categorical { name, categories } => {
                    for c in categories {
                        names.push(format!("{name}={c}"));
                    }
                }
            }
        }
        names
    }

    /// Check that the artifact describes a usable transformer for the seven
    /// training-time columns.
    ///
    /// Everything here is a *malformed artifact* failure: the JSON parsed,
    /// but the object cannot encode.
    pub fn validate(&self) -> Result<(), String> {
        if self.columns.is_empty() {
            return Err("encoder declares no columns".to_string());
        }

        let mut seen: Vec<&str> = Vec::with_capacity(self.columns.len());
        for col in self.columns.iter() {
            let name = col.name();
            if !FIELD_NAMES.contains(&name) {
                return Err(format!("encoder references unknown column `{name}`"));
            }
            if seen.contains(&name) {
                return Err(format!("encoder declares column `{name}` twice"));
            }
            seen.push(name);

            match col {
                ColumnSpec::Numeric { name, mean, std } => {
                    if !NUMERIC_FIELDS.contains(&name.as_str()) {
                        return Err(format!(
                            "encoder declares `{name}` as numeric, but it is categorical"
                        ));
                    }
                    if !mean.is_finite() {
                        return Err(format!("non-finite scaler mean for `{name}`"));
                    }
                    if !std.is_finite() || *std <= 0.0 {
                        return Err(format!(
                            "scaler std for `{name}` must be finite and > 0"
                        ));
                    }
                }
                ColumnSpec::Categorical { name, categories } => {
                    if NUMERIC_FIELDS.contains(&name.as_str()) {
                        return Err(format!(
                            "encoder declares `{name}` as categorical, but it is numeric"
                        ));
                    }
                    if categories.len() < 2 {
                        return Err(format!(
                            "one-hot vocabulary for `{name}` needs at least 2 categories"
                        ));
                    }
                    for (i, c) in categories.iter().enumerate() {
                        if categories[..i].contains(c) {
                            return Err(format!(
                                "duplicate category `{c}` in vocabulary for `{name}`"
                            ));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Encode one record into the fixed-length feature vector.
    ///
    /// The record supplies values by training-time column name, so only the
    /// artifact's column order matters here. A label missing from the fitted
    /// vocabulary is a per-request error (the artifact was trained on a
    /// narrower vocabulary than the form offers).
    pub fn encode(&self, record: &StudentRecord) -> Result<DVector<f64>, String> {
        let mut out = Vec::with_capacity(self.output_len());

        for col in &self.columns {
            let value = record
                .field(col.name())
                .ok_or_else(|| format!("record has no column `{}`", col.name()))?;

            match (col, value) {
                (ColumnSpec::Numeric { mean, std, .. }, FieldValue::Score(x)) => {
                    out.push((x - mean) / std);
                }
                (ColumnSpec::Categorical { name, categories }, FieldValue::Label(label)) => {
                    let hit = categories.iter().position(|c| c == label);
                    let Some(idx) = hit else {
                        return Err(format!(
                            "label `{label}` is not in the fitted vocabulary for `{name}`"
                        ));
                    };
                    for i in 0..categories.len() {
                        out.push(if i == idx { 1.0 } else { 0.0 });
                    }
                }
                // Kind mismatches are rejected by `validate` at load time.
                (ColumnSpec::Numeric { name, .. }, FieldValue::Label(_)) => {
                    return Err(format!("column `{name}` is not numeric"));
                }
                (ColumnSpec::Categorical { name, .. }, FieldValue::Score(_)) => {
                    return Err(format!("column `{name}` is not categorical"));
                }
            }
        }

        Ok(DVector::from_vec(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gender, Lunch, ParentalEducation, RaceEthnicity, StudentRecord, TestPrep};

    fn small_encoder() -> FeatureEncoder {
        FeatureEncoder {
            columns: vec![
                ColumnSpec::Categorical {
                    name: "gender".to_string(),
                    categories: vec!["female".to_string(), "male".to_string()],
                },
                ColumnSpec::Numeric {
                    name: "reading_score".to_string(),
                    mean: 70.0,
                    std: 10.0,
                },
            ],
        }
    }

    #[test]
    fn encodes_one_hot_and_scaled_slots() {
        let enc = small_encoder();
        enc.validate().unwrap();
        assert_eq!(enc.output_len(), 3);

        let record = StudentRecord::new(
            Gender::Male,
            RaceEthnicity::GroupC,
            ParentalEducation::SomeCollege,
            Lunch::Standard,
            TestPrep::None,
            80,
            70,
        )
        .unwrap();

        let x = enc.encode(&record).unwrap();
        assert_eq!(x.as_slice(), &[0.0, 1.0, 1.0]);
    }

    #[test]
    fn feature_names_follow_slot_order() {
        let enc = small_encoder();
        assert_eq!(
            enc.feature_names(),
            vec!["gender=female", "gender=male", "reading_score"]
        );
    }

    #[test]
    fn vocabulary_miss_is_a_per_request_error() {
        let enc = FeatureEncoder {
            columns: vec![ColumnSpec::Categorical {
                name: "lunch".to_string(),
                // Trained without the free/reduced label.
                categories: vec!["standard".to_string(), "premium".to_string()],
            }],
        };
        enc.validate().unwrap();

        let mut record = StudentRecord::default();
        record.lunch = Lunch::FreeReduced;
        let err = enc.encode(&record).unwrap_err();
        assert!(err.contains("free/reduced"), "{err}");
        assert!(err.contains("lunch"), "{err}");
    }

    #[test]
    fn validate_rejects_unknown_and_misdeclared_columns() {
        let unknown = FeatureEncoder {
            columns: vec![ColumnSpec::Numeric {
                name: "math_score".to_string(),
                mean: 0.0,
                std: 1.0,
            }],
        };
        assert!(unknown.validate().unwrap_err().contains("unknown column"));

        let misdeclared = FeatureEncoder {
            columns: vec![ColumnSpec::Numeric {
                name: "gender".to_string(),
                mean: 0.0,
                std: 1.0,
            }],
        };
        assert!(misdeclared.validate().unwrap_err().contains("categorical"));

        let bad_std = FeatureEncoder {
            columns: vec![ColumnSpec::Numeric {
                name: "reading_score".to_string(),
                mean: 70.0,
                std: 0.0,
            }],
        };
        assert!(bad_std.validate().unwrap_err().contains("std"));
    }

    #[test]
    fn encoding_is_deterministic() {
        let enc = small_encoder();
        let record = StudentRecord::default();
        assert_eq!(enc.encode(&record).unwrap(), enc.encode(&record).unwrap());
    }
}
