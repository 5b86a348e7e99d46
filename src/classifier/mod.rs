//! The pre-trained reoperation classifier, consumed as a black box.
//!
//! - [`logistic`] — logistic regression over the 14 feature columns.
//! - [`forest`] — averaged ensemble of binary decision trees.
//! - [`artifact`] — loads either kind from a JSON model artifact.
//!
//! Every model answers with a class distribution; [`Classifier::positive_probability`]
//! turns that into the single scalar the estimator needs.

use crate::error::EstimateError;
use crate::models::{FeatureVector, FEATURE_COUNT};

pub mod artifact;
pub mod forest;
pub mod logistic;

/// Index of the "reoperation" class in a predicted distribution.
pub const POSITIVE_CLASS: usize = 1;

pub trait Classifier {
    /// Short model kind used in logs and reports.
    fn kind(&self) -> &'static str;

    /// Class distribution for a single feature row.
    fn predict_proba(&self, row: &[f64; FEATURE_COUNT]) -> Result<Vec<f64>, EstimateError>;

    /// Probability of the positive class for `features`.
    ///
    /// This is the only place the raw distribution is inspected.
    fn positive_probability(&self, features: &FeatureVector) -> Result<f64, EstimateError> {
        let distribution = self.predict_proba(&features.as_row())?;
        extract_positive(&distribution)
    }
}

fn extract_positive(distribution: &[f64]) -> Result<f64, EstimateError> {
    if distribution.len() <= POSITIVE_CLASS {
        return Err(EstimateError::ClassifierOutputMalformed(format!(
            "expected at least {} class probabilities, got {}",
            POSITIVE_CLASS + 1,
            distribution.len()
        )));
    }

    let p = distribution[POSITIVE_CLASS];
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(EstimateError::ClassifierOutputMalformed(format!(
            "positive-class probability {} is not within [0, 1]",
            p
        )));
    }
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::normalize::build_features;
    use crate::models::PatientCase;

    struct Canned(Vec<f64>);

    impl Classifier for Canned {
        fn kind(&self) -> &'static str {
            "canned"
        }

        fn predict_proba(&self, _row: &[f64; FEATURE_COUNT]) -> Result<Vec<f64>, EstimateError> {
            Ok(self.0.clone())
        }
    }

    fn features() -> FeatureVector {
        build_features(&PatientCase::default())
    }

    #[test]
    fn test_positive_class_is_second_entry() {
        let p = Canned(vec![0.7, 0.3]).positive_probability(&features()).unwrap();
        assert_eq!(p, 0.3);
    }

    #[test]
    fn test_single_entry_is_malformed() {
        let err = Canned(vec![1.0]).positive_probability(&features()).unwrap_err();
        assert!(matches!(err, EstimateError::ClassifierOutputMalformed(_)));
    }

    #[test]
    fn test_out_of_range_is_malformed() {
        for bad in [f64::NAN, -0.1, 1.5, f64::INFINITY] {
            let err = Canned(vec![0.5, bad]).positive_probability(&features()).unwrap_err();
            assert!(matches!(err, EstimateError::ClassifierOutputMalformed(_)));
        }
    }
}
