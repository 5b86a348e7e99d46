use serde::Deserialize;

use crate::error::EstimateError;
use crate::models::FEATURE_COUNT;

use super::Classifier;

/// Binary logistic regression: `p = sigmoid(intercept + coefficients · x)`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LogisticModel {
    pub fn check(&self) -> Result<(), EstimateError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(EstimateError::ClassifierUnavailable(format!(
                "logistic model has {} coefficients, expected {}",
                self.coefficients.len(),
                FEATURE_COUNT
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err(EstimateError::ClassifierUnavailable(
                "logistic model contains non-finite weights".to_string(),
            ));
        }
        Ok(())
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticModel {
    fn kind(&self) -> &'static str {
        "logistic"
    }

    /// Weights are validated once by [`LogisticModel::check`] when the artifact
    /// loads; only the width is re-checked here.
    fn predict_proba(&self, row: &[f64; FEATURE_COUNT]) -> Result<Vec<f64>, EstimateError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(EstimateError::ClassifierUnavailable(format!(
                "logistic model has {} coefficients, expected {}",
                self.coefficients.len(),
                FEATURE_COUNT
            )));
        }
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        let p = sigmoid(z);
        Ok(vec![1.0 - p, p])
    }
}
