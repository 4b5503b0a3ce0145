//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::StarError;
use crate::schema;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("CSV must contain columns: {}", schema::REQUIRED_COLUMNS.join(", "))]
    MissingColumns,

    #[error("Could not parse CSV: {0}")]
    Csv(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<polars::error::PolarsError> for ServerError {
    fn from(err: polars::error::PolarsError) -> Self {
        ServerError::Internal(err.to_string())
    }
}

impl From<StarError> for ServerError {
    fn from(err: StarError) -> Self {
        match err {
            StarError::DataError(msg) | StarError::SchemaError(msg) => {
                ServerError::BadRequest(msg)
            }
            StarError::ModelError(msg) => ServerError::Model(msg),
            StarError::SerializationError(msg) | StarError::ConfigError(msg) => {
                ServerError::Internal(msg)
            }
            StarError::IoError(e) => ServerError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::MissingColumns => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            ServerError::Csv(msg) => (StatusCode::BAD_REQUEST, format!("Could not parse CSV: {msg}")),
            ServerError::Model(msg) => {
                tracing::error!(detail = %msg, "Model invocation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed".to_string())
            }
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred".to_string())
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
