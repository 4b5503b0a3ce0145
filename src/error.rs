//! Error types for the star predictor

use thiserror::Error;

/// Result type alias for star predictor operations
pub type Result<T> = std::result::Result<T, StarError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum StarError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for StarError {
    fn from(err: polars::error::PolarsError) -> Self {
        StarError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for StarError {
    fn from(err: serde_json::Error) -> Self {
        StarError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for StarError {
    fn from(err: ndarray::ShapeError) -> Self {
        StarError::ModelError(err.to_string())
    }
}
