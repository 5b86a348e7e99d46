//! Turn a [`PatientCase`] into a calibrated reoperation risk.
//!
//! - [`normalize`] — capped-linear scaling and fixed-order feature assembly.
//! - [`calibration`] — risk-factor counting, the banded calibration factor and
//!   the 50% ceiling.

pub mod calibration;
pub mod normalize;

use crate::classifier::Classifier;
use crate::error::EstimateError;
use crate::models::{PatientCase, RiskEstimate, RiskTier};

use calibration::{active_risk_factors, calibrate, calibration_factor};
use normalize::build_features;

/// Estimate the one-year reoperation risk for `case`.
///
/// The classifier's positive-class probability is rescaled by a factor chosen
/// from the number of risk factors present, then capped at 50%. The result
/// depends only on `case` and the classifier.
pub fn estimate(
    classifier: &dyn Classifier,
    case: &PatientCase,
) -> Result<RiskEstimate, EstimateError> {
    case.validate()?;

    let features = build_features(case);
    let positive_probability = classifier.positive_probability(&features)?;
    let raw_percentage = positive_probability * 100.0;

    let risk_factors = active_risk_factors(case);
    let factor = calibration_factor(risk_factors.len());
    let percentage = calibrate(raw_percentage, factor);
    let tier = RiskTier::from_percentage(percentage);

    tracing::debug!(
        model = classifier.kind(),
        positive_probability,
        raw_percentage,
        risk_factors = risk_factors.len(),
        calibration_factor = factor,
        percentage,
        tier = %tier,
        "risk estimated"
    );

    Ok(RiskEstimate {
        percentage,
        tier,
        positive_probability,
        raw_percentage,
        risk_factors,
        calibration_factor: factor,
        features,
    })
}
