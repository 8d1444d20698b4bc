use thiserror::Error;

/// Errors raised at the ingestion boundary.
///
/// Everything past ingestion (diffing, sensitivity and replacement lookups) is
/// total and never produces one of these.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The handed-in document does not have the shape of a plan
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The document is not valid JSON
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file parsing error
    #[error("Failed to parse configuration: {0}")]
    Config(String),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for PlanError {
    fn from(err: serde_yaml::Error) -> Self {
        PlanError::Config(err.to_string())
    }
}

/// Result type for plan ingestion
pub type PlanResult<T> = Result<T, PlanError>;
