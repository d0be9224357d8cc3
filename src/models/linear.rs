//! Linear regression predictor.
//!
//! The model artifact is nothing more than the fitted parameters: an
//! intercept plus one coefficient per encoded slot. Prediction is a single
//! dot product; there is no randomness and no state.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Fitted linear model parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    /// Human-readable model name, e.g. `linear_regression`.
    pub name: String,
    pub intercept: f64,
    /// One coefficient per encoded slot, in encoder slot order.
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    /// Number of features this model expects.
    pub fn input_len(&self) -> usize {
        self.coefficients.len()
    }

    /// Check that the artifact describes a usable predictor.
    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("model declares no coefficients".to_string());
        }
        if !self.intercept.is_finite() {
            return Err("non-finite model intercept".to_string());
        }
        if let Some(idx) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(format!("non-finite coefficient at slot {idx}"));
        }
        Ok(())
    }

    /// Predict the score for one encoded vector.
    pub fn predict(&self, x: &DVector<f64>) -> Result<f64, String> {
        if x.len() != self.coefficients.len() {
            return Err(format!(
                "feature vector has {} slots but the model expects {}",
                x.len(),
                self.coefficients.len()
            ));
        }

        let w = DVector::from_column_slice(&self.coefficients);
        let y = self.intercept + w.dot(x);
        if !y.is_finite() {
            return Err("model produced a non-finite score".to_string());
        }
        Ok(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_is_intercept_plus_dot_product() {
        let model = LinearModel {
            name: "linear_regression".to_string(),
            intercept: 1.0,
            coefficients: vec![2.0, -0.5],
        };
        model.validate().unwrap();

        let x = DVector::from_column_slice(&[3.0, 4.0]);
        let y = model.predict(&x).unwrap();
        assert!((y - (1.0 + 6.0 - 2.0)).abs() < 1e-12);
    }

    #[test]
    fn predict_rejects_width_mismatch() {
        let model = LinearModel {
            name: "linear_regression".to_string(),
            intercept: 0.0,
            coefficients: vec![1.0, 1.0, 1.0],
        };
        let x = DVector::from_column_slice(&[1.0, 2.0]);
        let err = model.predict(&x).unwrap_err();
        assert!(err.contains("expects 3"), "{err}");
    }

    #[test]
    fn validate_rejects_non_finite_parameters() {
        let model = LinearModel {
            name: "linear_regression".to_string(),
            intercept: f64::NAN,
            coefficients: vec![1.0],
        };
        assert!(model.validate().unwrap_err().contains("intercept"));

        let model = LinearModel {
            name: "linear_regression".to_string(),
            intercept: 0.0,
            coefficients: vec![1.0, f64::INFINITY],
        };
        assert!(model.validate().unwrap_err().contains("slot 1"));
    }
}
