use crate::models::{PatientCase, RiskFactor};

/// Upper bound of any reported risk, in percent.
pub const MAX_RISK_PERCENT: f64 = 50.0;

/// Factor for 0–2 risk factors.
pub const FACTOR_FEW: f64 = 0.15;
/// Factor for 3–5 risk factors.
pub const FACTOR_SEVERAL: f64 = 0.8;
/// Factor for 6 or more risk factors.
pub const FACTOR_MANY: f64 = 1.2;

/// Collect the risk-factor conditions that hold on the raw (unscaled) case.
pub fn active_risk_factors(case: &PatientCase) -> Vec<RiskFactor> {
    let checks = [
        (case.chf, RiskFactor::HeartFailure),
        (case.smoking, RiskFactor::Smoking),
        (case.obesity, RiskFactor::Obesity),
        (case.icu_stay, RiskFactor::IcuStay),
        (case.steroid_use, RiskFactor::SteroidUse),
        (case.ssi, RiskFactor::SurgicalSiteInfection),
        (case.charlson_score > 2, RiskFactor::HighComorbidity),
        (case.fusion_levels > 2, RiskFactor::MultiLevelFusion),
        (case.age > 60.0, RiskFactor::AgeOver60),
        (case.length_of_stay_days > 10.0, RiskFactor::ProlongedStay),
    ];

    checks
        .into_iter()
        .filter(|(holds, _)| *holds)
        .map(|(_, factor)| factor)
        .collect()
}

/// Step-function multiplier for a risk-factor count. No interpolation between bands.
pub fn calibration_factor(risk_factor_count: usize) -> f64 {
    match risk_factor_count {
        0..=2 => FACTOR_FEW,
        3..=5 => FACTOR_SEVERAL,
        _ => FACTOR_MANY,
    }
}

/// Scale a raw percentage and cap it at [`MAX_RISK_PERCENT`].
pub fn calibrate(raw_percentage: f64, factor: f64) -> f64 {
    (raw_percentage * factor).min(MAX_RISK_PERCENT)
}
