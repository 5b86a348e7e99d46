//! Rendering a finished estimate.
//!
//! - [`terminal`] — colored summary, optional detail tables.
//! - [`pdf`] — single-page printable report.

pub mod pdf;
pub mod terminal;

use crate::models::{PatientCase, RiskEstimate};

/// Everything a renderer needs for one invocation.
pub struct Report<'a> {
    pub case: &'a PatientCase,
    pub estimate: &'a RiskEstimate,
    pub advisory: &'a str,
    /// Model kind, plus the artifact description when it has one.
    pub model: String,
}

/// Percentages are shown with one decimal place.
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

/// Human-readable patient attributes in intake-form order.
pub fn patient_rows(case: &PatientCase) -> Vec<(&'static str, String)> {
    vec![
        ("Age", format!("{} years", case.age)),
        (
            "Race",
            if case.race_white { "White" } else { "Other" }.to_string(),
        ),
        (
            "Insurance",
            if case.insurance_private { "Private" } else { "Other" }.to_string(),
        ),
        (
            "Discharge",
            if case.discharge_home { "Home" } else { "Other" }.to_string(),
        ),
        ("Hospital stay", format!("{} days", case.length_of_stay_days)),
        ("Fusion levels", case.fusion_levels.to_string()),
        ("Charlson score", case.charlson_score.to_string()),
        ("Heart failure", yes_no(case.chf)),
        ("Current smoker", yes_no(case.smoking)),
        ("Obesity", yes_no(case.obesity)),
        ("ICU stay", yes_no(case.icu_stay)),
        ("Steroid use", yes_no(case.steroid_use)),
        ("Surgical site infection", yes_no(case.ssi)),
    ]
}
