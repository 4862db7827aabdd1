//! Error types for the playerpulse analytics core

use thiserror::Error;

/// Result type alias for playerpulse operations
pub type Result<T> = std::result::Result<T, PulseError>;

/// Main error type for the analytics core.
///
/// Every variant is local to one analysis cycle: the hosting dashboard catches
/// the error at the pipeline boundary and renders it as a user-facing message.
#[derive(Error, Debug)]
pub enum PulseError {
    #[error("empty input: the filtered record set has no rows")]
    EmptyInput,

    #[error("no trainable data: cleaning removed all {removed} rows")]
    NoTrainableData { removed: usize },

    #[error("split failed: class {class} has {count} members, need at least {needed}")]
    Split {
        class: String,
        count: usize,
        needed: usize,
    },

    #[error("schema mismatch: {feature_count} feature names vs {coefficient_count} coefficients")]
    SchemaMismatch {
        feature_count: usize,
        coefficient_count: usize,
    },

    #[error("fit failed: {0}")]
    Fit(String),

    #[error("invalid schema: {0}")]
    Schema(String),

    #[error("data error: {0}")]
    Data(String),

    #[error("invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    #[error("model not fitted")]
    ModelNotFitted,

    #[error("invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for PulseError {
    fn from(err: polars::error::PolarsError) -> Self {
        PulseError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for PulseError {
    fn from(err: serde_json::Error) -> Self {
        PulseError::Serialization(err.to_string())
    }
}
