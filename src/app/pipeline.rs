//! The inference pipeline shared by the CLI and TUI front-ends.
//!
//! Loading happens once per process: both artifacts are read, validated, and
//! cross-checked, then held immutably for the process lifetime. Every request
//! is the same two-stage pass: encode the record, predict on the vector.
//! There is no state across requests and nothing to retry.

use chrono::NaiveDate;

use crate::domain::{ArtifactPaths, Contribution, Prediction, StudentRecord};
use crate::encode::FeatureEncoder;
use crate::error::AppError;
use crate::io::artifact::{read_encoder_json, read_model_json};
use crate::models::LinearModel;

/// Metadata carried alongside the loaded handles, for headers and `show`.
#[derive(Debug, Clone)]
pub struct PipelineMeta {
    pub model_name: String,
    pub encoder_trained_at: NaiveDate,
    pub model_trained_at: NaiveDate,
    pub feature_count: usize,
}

/// The loaded encoder + model pair.
///
/// Construction validates compatibility, so a `Pipeline` that exists can
/// always run a request end to end (individual requests can still fail on
/// vocabulary gaps).
#[derive(Debug)]
pub struct Pipeline {
    encoder: FeatureEncoder,
    model: LinearModel,
    meta: PipelineMeta,
}

impl Pipeline {
    /// Load both artifacts from disk and cross-check them.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, AppError> {
        let encoder_file = read_encoder_json(&paths.encoder)?;
        let model_file = read_model_json(&paths.model)?;

        let meta = PipelineMeta {
            model_name: model_file.model.name.clone(),
            encoder_trained_at: encoder_file.trained_at,
            model_trained_at: model_file.trained_at,
            feature_count: encoder_file.encoder.output_len(),
        };

        Self::from_parts(encoder_file.encoder, model_file.model, meta)
    }

    /// Pair an already-validated encoder and model.
    ///
    /// The width check lives here so it also guards artifact pairs that were
    /// individually valid but trained against each other's wrong version.
    pub fn from_parts(
        encoder: FeatureEncoder,
        model: LinearModel,
        meta: PipelineMeta,
    ) -> Result<Self, AppError> {
        let produced = encoder.output_len();
        let expected = model.input_len();
        if produced != expected {
            return Err(AppError::new(
                3,
                format!(
                    "Artifact mismatch: encoder produces {produced} features but the model expects {expected}. \
                     The two artifacts were not trained together."
                ),
            ));
        }

        Ok(Self {
            encoder,
            model,
            meta,
        })
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn meta(&self) -> &PipelineMeta {
        &self.meta
    }

    /// Run one record through encode → predict.
    ///
    /// Failures are reported, never panicked; the caller decides whether to
    /// print to stderr (CLI) or show a banner (TUI).
    pub fn predict(&self, record: &StudentRecord) -> Result<Prediction, AppError> {
        let x = self
            .encoder
            .encode(record)
            .map_err(|e| AppError::new(4, format!("Encoding failed: {e}")))?;

        let score = self
            .model
            .predict(&x)
            .map_err(|e| AppError::new(4, format!("Prediction failed: {e}")))?;

        let contributions = self
            .encoder
            .feature_names()
            .into_iter()
            .zip(x.iter())
            .zip(self.model.coefficients.iter())
            .map(|((feature, &value), &weight)| Contribution {
                feature,
                value,
                weight,
                contribution: value * weight,
            })
            .collect();

        Ok(Prediction {
            score,
            intercept: self.model.intercept,
            contributions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gender, Lunch, ParentalEducation, RaceEthnicity, TestPrep};
    use crate::encode::ColumnSpec;

    fn cats(name: &str, labels: &[&str]) -> ColumnSpec {
        ColumnSpec::Categorical {
            name: name.to_string(),
            categories: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn num(name: &str, mean: f64, std: f64) -> ColumnSpec {
        ColumnSpec::Numeric {
            name: name.to_string(),
            mean,
            std,
        }
    }

    /// A full seven-column pipeline matching the shipped artifact layout.
    fn full_pipeline() -> Pipeline {
        let encoder = FeatureEncoder {
            columns: vec![
                cats("gender", &["female", "male"]),
                cats("race_ethnicity", &["group A", "group B", "group C", "group D", "group E"]),
                cats(
                    "parental_level_of_education",
                    &[
                        "some high school",
                        "high school",
                        "some college",
                        "associate's degree",
                        "bachelor's degree",
                        "master's degree",
                    ],
                ),
                cats("lunch", &["standard", "free/reduced"]),
                cats("test_preparation_course", &["none", "completed"]),
                num("reading_score", 69.0, 14.0),
                num("writing_score", 68.0, 15.0),
            ],
        };
        encoder.validate().unwrap();

        let model = LinearModel {
            name: "linear_regression".to_string(),
            intercept: 66.0,
            coefficients: vec![
                -4.0, 4.0, // gender
                -2.0, -1.0, 0.0, 1.0, 2.0, // race
                -1.2, -1.0, 0.2, 0.5, 0.6, 0.9, // parental education
                1.9, -1.9, // lunch
                1.6, -1.6, // test prep
                5.7, 8.4, // scaled scores
            ],
        };
        model.validate().unwrap();

        let meta = PipelineMeta {
            model_name: model.name.clone(),
            encoder_trained_at: NaiveDate::from_ymd_opt(2026, 5, 18).unwrap(),
            model_trained_at: NaiveDate::from_ymd_opt(2026, 5, 18).unwrap(),
            feature_count: encoder.output_len(),
        };

        Pipeline::from_parts(encoder, model, meta).unwrap()
    }

    fn example_record() -> StudentRecord {
        StudentRecord::new(
            Gender::Female,
            RaceEthnicity::GroupB,
            ParentalEducation::BachelorsDegree,
            Lunch::Standard,
            TestPrep::Completed,
            72,
            74,
        )
        .unwrap()
    }

    #[test]
    fn example_scenario_yields_one_finite_two_decimal_score() {
        let pipeline = full_pipeline();
        let prediction = pipeline.predict(&example_record()).unwrap();

        assert!(prediction.score.is_finite());
        let shown = prediction.display_score();
        let (_, frac) = shown.split_once('.').unwrap();
        assert_eq!(frac.len(), 2);
    }

    #[test]
    fn prediction_is_deterministic() {
        let pipeline = full_pipeline();
        let a = pipeline.predict(&example_record()).unwrap();
        let b = pipeline.predict(&example_record()).unwrap();
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn score_boundaries_stay_finite() {
        let pipeline = full_pipeline();
        for (reading, writing) in [(0u8, 0u8), (0, 100), (100, 0), (100, 100)] {
            let mut record = example_record();
            record.reading_score = reading;
            record.writing_score = writing;
            let p = pipeline.predict(&record).unwrap();
            assert!(p.score.is_finite(), "non-finite at {reading}/{writing}");
        }
    }

    #[test]
    fn every_in_domain_record_scores_without_fault() {
        let pipeline = full_pipeline();
        for gender in Gender::ALL {
            for race in RaceEthnicity::ALL {
                for parental in ParentalEducation::ALL {
                    for lunch in Lunch::ALL {
                        for prep in TestPrep::ALL {
                            let record = StudentRecord::new(
                                gender, race, parental, lunch, prep, 55, 45,
                            )
                            .unwrap();
                            let p = pipeline.predict(&record).unwrap();
                            assert!(p.score.is_finite());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn contributions_sum_to_score_minus_intercept() {
        let pipeline = full_pipeline();
        let p = pipeline.predict(&example_record()).unwrap();
        let sum: f64 = p.contributions.iter().map(|c| c.contribution).sum();
        assert!((p.intercept + sum - p.score).abs() < 1e-9);
        assert_eq!(p.contributions.len(), pipeline.meta().feature_count);
    }

    #[test]
    fn mismatched_widths_are_rejected_at_pairing_time() {
        let encoder = FeatureEncoder {
            columns: vec![cats("gender", &["female", "male"])],
        };
        let model = LinearModel {
            name: "linear_regression".to_string(),
            intercept: 0.0,
            coefficients: vec![1.0, 2.0, 3.0],
        };
        let meta = PipelineMeta {
            model_name: model.name.clone(),
            encoder_trained_at: NaiveDate::from_ymd_opt(2026, 5, 18).unwrap(),
            model_trained_at: NaiveDate::from_ymd_opt(2026, 5, 18).unwrap(),
            feature_count: encoder.output_len(),
        };

        let err = Pipeline::from_parts(encoder, model, meta).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("mismatch"), "{err}");
    }
}
