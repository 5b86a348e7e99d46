//! Collecting a [`PatientCase`] from a case file and holding it to the intake
//! form's ranges before it reaches the estimator.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::models::PatientCase;

/// Supported case-file encodings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaseFormat {
    Toml,
    Json,
}

/// Detect the case-file format from its extension.
pub fn detect_format(path: &Path) -> Option<CaseFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Some(CaseFormat::Toml),
        Some(ext) if ext.eq_ignore_ascii_case("json") => Some(CaseFormat::Json),
        _ => None,
    }
}

/// Read a case file. Fields left out take the intake form's defaults.
pub fn load_case(path: &Path) -> Result<PatientCase> {
    let Some(format) = detect_format(path) else {
        bail!(
            "Unsupported case file {} (expected .toml or .json)",
            path.display()
        );
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read case file {}", path.display()))?;

    let case = match format {
        CaseFormat::Toml => toml::from_str(&content)
            .with_context(|| format!("Invalid case file {}", path.display()))?,
        CaseFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("Invalid case file {}", path.display()))?,
    };

    tracing::debug!(path = %path.display(), ?format, "loaded case file");
    Ok(case)
}

pub const AGE_RANGE: (f64, f64) = (18.0, 100.0);
pub const LOS_RANGE: (f64, f64) = (1.0, 30.0);
pub const FUSION_LEVELS_RANGE: (u32, u32) = (1, 5);
pub const CHARLSON_RANGE: (u32, u32) = (0, 10);

/// Hold a case to the ranges the intake form accepts.
pub fn enforce_form_bounds(case: &PatientCase) -> Result<()> {
    check_range("age", case.age, AGE_RANGE)?;
    check_range("length_of_stay_days", case.length_of_stay_days, LOS_RANGE)?;
    check_range("fusion_levels", case.fusion_levels, FUSION_LEVELS_RANGE)?;
    check_range("charlson_score", case.charlson_score, CHARLSON_RANGE)?;
    Ok(())
}

fn check_range<T>(field: &str, value: T, (min, max): (T, T)) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    // written so that NaN fails the check
    if !(value >= min && value <= max) {
        bail!("{} must be between {} and {}, got {}", field, min, max, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("case.toml")), Some(CaseFormat::Toml));
        assert_eq!(detect_format(Path::new("case.JSON")), Some(CaseFormat::Json));
        assert_eq!(detect_format(Path::new("case.yaml")), None);
        assert_eq!(detect_format(Path::new("case")), None);
    }

    #[test]
    fn test_load_toml_case() {
        let mut f = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            f,
            r#"
age = 72
race_white = false
length_of_stay_days = 12
fusion_levels = 3
charlson_score = 4
smoking = true
"#
        )
        .unwrap();

        let case = load_case(f.path()).unwrap();
        assert_eq!(case.age, 72.0);
        assert!(!case.race_white);
        assert!(case.insurance_private);
        assert_eq!(case.length_of_stay_days, 12.0);
        assert_eq!(case.fusion_levels, 3);
        assert_eq!(case.charlson_score, 4);
        assert!(case.smoking);
        assert!(!case.chf);
    }

    #[test]
    fn test_load_json_case() {
        let mut f = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(f, r#"{{"age": 55, "los_days": 3, "ssi": true}}"#).unwrap();

        let case = load_case(f.path()).unwrap();
        assert_eq!(case.age, 55.0);
        assert_eq!(case.length_of_stay_days, 3.0);
        assert!(case.ssi);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let f = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        assert!(load_case(f.path()).is_err());
    }

    #[test]
    fn test_form_bounds() {
        assert!(enforce_form_bounds(&PatientCase::default()).is_ok());

        let too_young = PatientCase {
            age: 17.0,
            ..PatientCase::default()
        };
        assert!(enforce_form_bounds(&too_young).is_err());

        let long_stay = PatientCase {
            length_of_stay_days: 31.0,
            ..PatientCase::default()
        };
        assert!(enforce_form_bounds(&long_stay).is_err());

        let many_levels = PatientCase {
            fusion_levels: 6,
            ..PatientCase::default()
        };
        assert!(enforce_form_bounds(&many_levels).is_err());

        let charlson = PatientCase {
            charlson_score: 11,
            ..PatientCase::default()
        };
        assert!(enforce_form_bounds(&charlson).is_err());

        let nan_age = PatientCase {
            age: f64::NAN,
            ..PatientCase::default()
        };
        assert!(enforce_form_bounds(&nan_age).is_err());
    }
}
