use serde::{Deserialize, Serialize};

use crate::error::EstimateError;

/// One patient, as collected by the intake form or read from a case file.
///
/// Missing fields in a case file take the intake form's defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatientCase {
    pub age: f64,
    pub race_white: bool,
    pub insurance_private: bool,
    pub discharge_home: bool,
    #[serde(alias = "los_days")]
    pub length_of_stay_days: f64,
    pub fusion_levels: u32,
    pub charlson_score: u32,
    pub chf: bool,
    pub smoking: bool,
    pub obesity: bool,
    pub icu_stay: bool,
    pub steroid_use: bool,
    pub ssi: bool,
}

impl Default for PatientCase {
    fn default() -> Self {
        PatientCase {
            age: 65.0,
            race_white: true,
            insurance_private: true,
            discharge_home: true,
            length_of_stay_days: 5.0,
            fusion_levels: 2,
            charlson_score: 0,
            chf: false,
            smoking: false,
            obesity: false,
            icu_stay: false,
            steroid_use: false,
            ssi: false,
        }
    }
}

impl PatientCase {
    /// Reject values the estimator cannot interpret at all.
    ///
    /// This is the structural domain only; the tighter clinical ranges of the
    /// intake form are enforced by [`crate::intake::enforce_form_bounds`].
    pub fn validate(&self) -> Result<(), EstimateError> {
        if !self.age.is_finite() || self.age < 0.0 {
            return Err(EstimateError::invalid(
                "age",
                format!("expected a non-negative number of years, got {}", self.age),
            ));
        }
        if !self.length_of_stay_days.is_finite() || self.length_of_stay_days < 0.0 {
            return Err(EstimateError::invalid(
                "length_of_stay_days",
                format!(
                    "expected a non-negative number of days, got {}",
                    self.length_of_stay_days
                ),
            ));
        }
        if self.fusion_levels == 0 {
            return Err(EstimateError::invalid(
                "fusion_levels",
                "at least one fused level is required",
            ));
        }
        Ok(())
    }
}

/// Number of columns the classifier expects.
pub const FEATURE_COUNT: usize = 14;

/// Column names in the order the classifier was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "race_white",
    "insurance_private",
    "discharge_home",
    "los_days",
    "fusion_levels",
    "anterior_approach",
    "charlson_score",
    "chf",
    "smoking",
    "obesity",
    "icu_stay",
    "steroid_use",
    "ssi",
];

/// Numeric encoding of a [`PatientCase`] as consumed by the classifier.
///
/// Field order matches [`FEATURE_NAMES`]; see [`FeatureVector::as_row`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub age: f64,
    pub race_white: f64,
    pub insurance_private: f64,
    pub discharge_home: f64,
    pub los_days: f64,
    pub fusion_levels: f64,
    /// Surgical approach column of the training data; never collected, always 0.
    pub anterior_approach: f64,
    pub charlson_score: f64,
    pub chf: f64,
    pub smoking: f64,
    pub obesity: f64,
    pub icu_stay: f64,
    pub steroid_use: f64,
    pub ssi: f64,
}

impl FeatureVector {
    pub fn as_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age,
            self.race_white,
            self.insurance_private,
            self.discharge_home,
            self.los_days,
            self.fusion_levels,
            self.anterior_approach,
            self.charlson_score,
            self.chf,
            self.smoking,
            self.obesity,
            self.icu_stay,
            self.steroid_use,
            self.ssi,
        ]
    }
}

/// Conditions counted toward the calibration band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    HeartFailure,
    Smoking,
    Obesity,
    IcuStay,
    SteroidUse,
    SurgicalSiteInfection,
    HighComorbidity,
    MultiLevelFusion,
    AgeOver60,
    ProlongedStay,
}

impl std::fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskFactor::HeartFailure => write!(f, "Heart failure"),
            RiskFactor::Smoking => write!(f, "Current smoker"),
            RiskFactor::Obesity => write!(f, "Obesity (BMI >= 30)"),
            RiskFactor::IcuStay => write!(f, "ICU stay"),
            RiskFactor::SteroidUse => write!(f, "Steroid use"),
            RiskFactor::SurgicalSiteInfection => write!(f, "Surgical site infection"),
            RiskFactor::HighComorbidity => write!(f, "Charlson score > 2"),
            RiskFactor::MultiLevelFusion => write!(f, "More than 2 fusion levels"),
            RiskFactor::AgeOver60 => write!(f, "Age over 60"),
            RiskFactor::ProlongedStay => write!(f, "Hospital stay over 10 days"),
        }
    }
}

/// Advisory tier derived from the calibrated percentage. Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    /// `r > 20` is high, `10 < r <= 20` is moderate, anything else is low.
    pub fn from_percentage(risk: f64) -> Self {
        if risk > 20.0 {
            RiskTier::High
        } else if risk > 10.0 {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Moderate => write!(f, "moderate"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

/// Result of one estimate, with the intermediate values that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct RiskEstimate {
    /// Calibrated risk in percent, always within `[0, 50]`.
    pub percentage: f64,
    pub tier: RiskTier,
    pub positive_probability: f64,
    pub raw_percentage: f64,
    pub risk_factors: Vec<RiskFactor>,
    pub calibration_factor: f64,
    pub features: FeatureVector,
}

impl RiskEstimate {
    pub fn risk_factor_count(&self) -> usize {
        self.risk_factors.len()
    }
}

/// Everything the JSON report emits for one invocation.
#[derive(Debug, Serialize)]
pub struct Assessment<'a> {
    pub patient: &'a PatientCase,
    pub estimate: &'a RiskEstimate,
    pub advisory: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(RiskTier::from_percentage(20.0), RiskTier::Moderate);
        assert_eq!(RiskTier::from_percentage(20.01), RiskTier::High);
        assert_eq!(RiskTier::from_percentage(10.0), RiskTier::Low);
        assert_eq!(RiskTier::from_percentage(10.01), RiskTier::Moderate);
        assert_eq!(RiskTier::from_percentage(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_percentage(50.0), RiskTier::High);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(RiskTier::Low < RiskTier::Moderate);
        assert!(RiskTier::Moderate < RiskTier::High);
    }

    #[test]
    fn test_validate_rejects_out_of_domain() {
        let negative_age = PatientCase {
            age: -1.0,
            ..PatientCase::default()
        };
        assert!(matches!(
            negative_age.validate(),
            Err(EstimateError::InvalidInput { field: "age", .. })
        ));

        let no_levels = PatientCase {
            fusion_levels: 0,
            ..PatientCase::default()
        };
        assert!(matches!(
            no_levels.validate(),
            Err(EstimateError::InvalidInput { field: "fusion_levels", .. })
        ));

        let nan_stay = PatientCase {
            length_of_stay_days: f64::NAN,
            ..PatientCase::default()
        };
        assert!(matches!(
            nan_stay.validate(),
            Err(EstimateError::InvalidInput { field: "length_of_stay_days", .. })
        ));
    }

    #[test]
    fn test_validate_accepts_extreme_but_finite_values() {
        let case = PatientCase {
            age: 200.0,
            length_of_stay_days: 100.0,
            ..PatientCase::default()
        };
        assert!(case.validate().is_ok());
    }

    #[test]
    fn test_case_deserialize_defaults_and_alias() {
        let case: PatientCase = toml::from_str("age = 70\nlos_days = 12\nsmoking = true").unwrap();
        assert_eq!(case.age, 70.0);
        assert_eq!(case.length_of_stay_days, 12.0);
        assert!(case.smoking);
        assert_eq!(case.fusion_levels, 2);
        assert!(case.race_white);
    }

    #[test]
    fn test_assessment_json_shape() {
        let patient = PatientCase {
            age: 70.0,
            smoking: true,
            ..PatientCase::default()
        };
        let estimate = RiskEstimate {
            percentage: 12.0,
            tier: RiskTier::Moderate,
            positive_probability: 0.15,
            raw_percentage: 15.0,
            risk_factors: vec![RiskFactor::Smoking, RiskFactor::AgeOver60, RiskFactor::IcuStay],
            calibration_factor: 0.8,
            features: FeatureVector {
                age: 70.0 / 75.5,
                race_white: 1.0,
                insurance_private: 1.0,
                discharge_home: 1.0,
                los_days: 5.0 / 36.8,
                fusion_levels: 2.0,
                anterior_approach: 0.0,
                charlson_score: 0.0,
                chf: 0.0,
                smoking: 1.0,
                obesity: 0.0,
                icu_stay: 1.0,
                steroid_use: 0.0,
                ssi: 0.0,
            },
        };
        let assessment = Assessment {
            patient: &patient,
            estimate: &estimate,
            advisory: "Moderate Risk: Monitor closely during recovery.",
        };

        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json["patient"]["age"], 70.0);
        assert_eq!(json["patient"]["smoking"], true);
        assert_eq!(json["patient"]["length_of_stay_days"], 5.0);
        assert_eq!(json["estimate"]["tier"], "moderate");
        assert_eq!(json["estimate"]["percentage"], 12.0);
        assert_eq!(json["estimate"]["calibration_factor"], 0.8);
        assert_eq!(
            json["estimate"]["risk_factors"],
            serde_json::json!(["smoking", "age_over60", "icu_stay"])
        );
        assert_eq!(json["estimate"]["features"]["anterior_approach"], 0.0);
        assert_eq!(
            json["advisory"],
            "Moderate Risk: Monitor closely during recovery."
        );
    }

    #[test]
    fn test_case_rejects_unknown_field() {
        let result: Result<PatientCase, _> = serde_json::from_str(r#"{"agee": 70}"#);
        assert!(result.is_err());
    }
}
