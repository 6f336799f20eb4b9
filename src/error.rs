//! Error types for the linewatch service

use thiserror::Error;

/// Result type alias for linewatch operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Main error type for the prediction service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Empty window: {0}")]
    EmptyWindow(String),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Model not trained")]
    ModelNotTrained,

    #[error("Training failed: {0}")]
    TrainingFailed(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<polars::error::PolarsError> for ServiceError {
    fn from(err: polars::error::PolarsError) -> Self {
        ServiceError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Serialization(err.to_string())
    }
}
