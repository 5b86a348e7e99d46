use std::path::Path;

use serde::Deserialize;

use crate::error::EstimateError;
use crate::models::FEATURE_NAMES;

use super::forest::ForestModel;
use super::logistic::LogisticModel;
use super::Classifier;

/// The only artifact layout this build understands.
pub const FORMAT_VERSION: u32 = 1;

/// On-disk model artifact, e.g.:
///
/// ```json
/// {
///   "format_version": 1,
///   "description": "...",
///   "features": ["age", "race_white", ...],
///   "model": { "kind": "logistic", "intercept": -2.0, "coefficients": [...] }
/// }
/// ```
#[derive(Debug, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    #[serde(default)]
    description: Option<String>,
    features: Vec<String>,
    model: ModelSpec,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum ModelSpec {
    Logistic(LogisticModel),
    Forest(ForestModel),
}

/// A classifier ready to serve estimates for the rest of the process.
pub struct LoadedModel {
    pub classifier: Box<dyn Classifier>,
    pub description: Option<String>,
}

/// Read and validate a model artifact from `path`.
pub fn load_model(path: &Path) -> Result<LoadedModel, EstimateError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        EstimateError::ClassifierUnavailable(format!(
            "cannot read model artifact {}: {}",
            path.display(),
            e
        ))
    })?;

    let model = parse_artifact(&content)?;
    tracing::info!(
        path = %path.display(),
        kind = model.classifier.kind(),
        "loaded classifier"
    );
    Ok(model)
}

/// Parse and validate an artifact document.
///
/// The feature list must match [`FEATURE_NAMES`] exactly, in order, since the
/// models address columns by position.
pub fn parse_artifact(content: &str) -> Result<LoadedModel, EstimateError> {
    let artifact: ModelArtifact = serde_json::from_str(content).map_err(|e| {
        EstimateError::ClassifierUnavailable(format!("model artifact is not valid: {}", e))
    })?;

    if artifact.format_version != FORMAT_VERSION {
        return Err(EstimateError::ClassifierUnavailable(format!(
            "unsupported model artifact version {} (expected {})",
            artifact.format_version, FORMAT_VERSION
        )));
    }

    if artifact.features.len() != FEATURE_NAMES.len()
        || artifact
            .features
            .iter()
            .zip(FEATURE_NAMES.iter())
            .any(|(got, want)| got != want)
    {
        return Err(EstimateError::ClassifierUnavailable(format!(
            "model expects features [{}], this build provides [{}]",
            artifact.features.join(", "),
            FEATURE_NAMES.join(", ")
        )));
    }

    let classifier: Box<dyn Classifier> = match artifact.model {
        ModelSpec::Logistic(model) => {
            model.check()?;
            Box::new(model)
        }
        ModelSpec::Forest(model) => {
            model.check()?;
            tracing::debug!(trees = model.trees.len(), "forest model validated");
            Box::new(model)
        }
    };

    Ok(LoadedModel {
        classifier,
        description: artifact.description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn features_json() -> String {
        serde_json::to_string(&FEATURE_NAMES).unwrap()
    }

    fn logistic_artifact() -> String {
        format!(
            r#"{{
                "format_version": 1,
                "description": "test model",
                "features": {},
                "model": {{
                    "kind": "logistic",
                    "intercept": 0.0,
                    "coefficients": [0,0,0,0,0,0,0,0,0,0,0,0,0,0]
                }}
            }}"#,
            features_json()
        )
    }

    #[test]
    fn test_load_logistic_from_file() {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", logistic_artifact()).unwrap();

        let model = load_model(f.path()).unwrap();
        assert_eq!(model.classifier.kind(), "logistic");
        assert_eq!(model.description.as_deref(), Some("test model"));
        let probs = model.classifier.predict_proba(&[0.0; 14]).unwrap();
        assert_eq!(probs[1], 0.5);
    }

    #[test]
    fn test_parse_forest() {
        let doc = format!(
            r#"{{
                "format_version": 1,
                "features": {},
                "model": {{
                    "kind": "forest",
                    "trees": [ {{"leaf": {{"value": [3, 1]}}}} ]
                }}
            }}"#,
            features_json()
        );
        let model = parse_artifact(&doc).unwrap();
        assert_eq!(model.classifier.kind(), "forest");
        assert!(model.description.is_none());
        let probs = model.classifier.predict_proba(&[0.0; 14]).unwrap();
        assert!((probs[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(&dir.path().join("absent.json")).err().unwrap();
        assert!(matches!(err, EstimateError::ClassifierUnavailable(_)));
    }

    #[test]
    fn test_reordered_features_rejected() {
        let mut names: Vec<&str> = FEATURE_NAMES.to_vec();
        names.swap(0, 4);
        let doc = logistic_artifact().replace(
            &features_json(),
            &serde_json::to_string(&names).unwrap(),
        );
        let err = parse_artifact(&doc).err().unwrap();
        assert!(matches!(err, EstimateError::ClassifierUnavailable(_)));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let doc = logistic_artifact().replace("\"format_version\": 1", "\"format_version\": 2");
        assert!(parse_artifact(&doc).is_err());
    }

    #[test]
    fn test_bundled_demo_model_parses() {
        let model = parse_artifact(include_str!("../../demos/model-logistic.json")).unwrap();
        assert_eq!(model.classifier.kind(), "logistic");
        let probs = model.classifier.predict_proba(&[0.0; 14]).unwrap();
        assert!(probs[1] > 0.0 && probs[1] < 1.0);
    }

    #[test]
    fn test_forest_with_bad_feature_index_rejected() {
        let doc = format!(
            r#"{{
                "format_version": 1,
                "features": {},
                "model": {{
                    "kind": "forest",
                    "trees": [
                        {{"split": {{"feature": 14, "threshold": 0.5,
                            "left": {{"leaf": {{"value": [1, 0]}}}},
                            "right": {{"leaf": {{"value": [0, 1]}}}}}}}}
                    ]
                }}
            }}"#,
            features_json()
        );
        let err = parse_artifact(&doc).err().unwrap();
        assert!(matches!(err, EstimateError::ClassifierUnavailable(_)));
    }

    #[test]
    fn test_logistic_with_wrong_width_rejected() {
        let doc = logistic_artifact().replace("[0,0,0,0,0,0,0,0,0,0,0,0,0,0]", "[0,0,0]");
        let err = parse_artifact(&doc).err().unwrap();
        assert!(matches!(err, EstimateError::ClassifierUnavailable(_)));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let doc = logistic_artifact().replace("\"logistic\"", "\"svm\"");
        assert!(parse_artifact(&doc).is_err());
    }
}
