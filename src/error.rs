use thiserror::Error;

/// Failures of a single risk estimate.
///
/// None of these are retried: the computation is deterministic, so the caller
/// has to supply a different case or a working model.
#[derive(Error, Debug)]
pub enum EstimateError {
    /// A raw patient attribute is outside its declared domain.
    #[error("invalid input for `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// The classifier is missing, unreadable, or structurally unusable.
    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    /// The classifier answered, but without a usable positive-class probability.
    #[error("classifier output malformed: {0}")]
    ClassifierOutputMalformed(String),
}

impl EstimateError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EstimateError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
