//! HTTP request handlers

use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::schema::{self, StarRecord};

use super::error::{Result, ServerError};
use super::state::AppState;

/// Single-prediction response body
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub predicted_type: String,
    pub predicted_probability: f64,
}

/// Liveness probe; constant payload, independent of model state.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Star Type Prediction API is running" }))
}

/// Predict the star type for a single observation.
///
/// The body is validated field-by-field before the model is touched; a
/// missing or mistyped field yields a 400 whose message names it.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<StarRecord>, JsonRejection>,
) -> Result<Json<PredictionResponse>> {
    let Json(record) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let features = record.to_dataframe()?;
    let proba = state.classifier.predict_proba(&features)?;
    if proba.nrows() == 0 {
        return Err(ServerError::Model("classifier returned no prediction".to_string()));
    }

    // One softmax pass: the label is the argmax class, the confidence its posterior
    let (best, predicted_probability) = proba.row(0).iter().cloned().enumerate().fold(
        (0, f64::NEG_INFINITY),
        |(bj, bv), (j, v)| if v > bv { (j, v) } else { (bj, bv) },
    );
    let predicted_type = state.classifier.labels()[best].clone();

    info!(%predicted_type, predicted_probability, "Single prediction served");

    Ok(Json(PredictionResponse {
        predicted_type,
        predicted_probability,
    }))
}

/// Predict star types for every row of an uploaded CSV.
///
/// The full original table, extra columns included, is returned with one
/// appended `Predicted Type` column, serialized through an in-memory buffer.
pub async fn bulk_predict(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.to_string()))?
    {
        // The upload is bound to the `file` field; anything else is skipped
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(e.to_string()))?;

        info!("Received file: {} ({} bytes)", file_name, data.len());

        // Polars would happily read arbitrary bytes as a one-column header
        if std::str::from_utf8(&data).is_err() {
            return Err(ServerError::Csv("file is not valid UTF-8".to_string()));
        }

        let mut df = CsvReadOptions::default()
            .with_infer_schema_length(Some(1000))
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(&data))
            .finish()
            .map_err(|e| ServerError::Csv(e.to_string()))?;

        if !schema::missing_columns(&df).is_empty() {
            return Err(ServerError::MissingColumns);
        }
        if df.column(schema::PREDICTED_COLUMN).is_ok() {
            return Err(ServerError::BadRequest(format!(
                "CSV must not already contain a '{}' column",
                schema::PREDICTED_COLUMN
            )));
        }

        // Features in model order; the original table is kept for output
        let features = schema::feature_frame(&df)?;
        let predictions = state.classifier.predict(&features)?;

        info!(rows = df.height(), "Bulk prediction served");

        df.with_column(Series::new(schema::PREDICTED_COLUMN.into(), predictions))?;

        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer)
            .finish(&mut df)
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        return Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("text/csv")),
                (
                    header::CONTENT_DISPOSITION,
                    HeaderValue::from_static("inline; filename=\"predicted_star_types.csv\""),
                ),
            ],
            buffer,
        ));
    }

    Err(ServerError::BadRequest("No file uploaded".to_string()))
}
