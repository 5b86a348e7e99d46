use crate::models::{FeatureVector, PatientCase};

/// Ages above this are evaluated as this value.
pub const AGE_CAP: f64 = 75.5;
const AGE_CENTER: f64 = 50.0;
const AGE_SCALE: f64 = 15.0;

/// Stays above this many days are evaluated as this value.
pub const LOS_CAP: f64 = 36.8;
const LOS_CENTER: f64 = 5.0;
const LOS_SCALE: f64 = 3.0;

/// Rescale age to the range the classifier was fitted on.
///
/// Only the upper end is capped; small values extrapolate linearly.
pub fn scale_age(age: f64) -> f64 {
    (age.min(AGE_CAP) - AGE_CENTER) / AGE_SCALE
}

/// Rescale length of stay to the range the classifier was fitted on.
///
/// Only the upper end is capped; short stays extrapolate linearly.
pub fn scale_los(days: f64) -> f64 {
    (days.min(LOS_CAP) - LOS_CENTER) / LOS_SCALE
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Encode a case as the classifier's fixed-order feature row.
pub fn build_features(case: &PatientCase) -> FeatureVector {
    FeatureVector {
        age: scale_age(case.age),
        race_white: flag(case.race_white),
        insurance_private: flag(case.insurance_private),
        discharge_home: flag(case.discharge_home),
        los_days: scale_los(case.length_of_stay_days),
        fusion_levels: f64::from(case.fusion_levels),
        anterior_approach: 0.0,
        charlson_score: f64::from(case.charlson_score),
        chf: flag(case.chf),
        smoking: flag(case.smoking),
        obesity: flag(case.obesity),
        icu_stay: flag(case.icu_stay),
        steroid_use: flag(case.steroid_use),
        ssi: flag(case.ssi),
    }
}
