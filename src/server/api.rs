//! API route definitions

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::StarError;

use super::{handlers, state::AppState, ServerConfig};

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found. POST /predict or /bulk_predict, GET / for health." })),
    )
}

async fn handle_405() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed." })),
    )
}

/// Create the main application router.
///
/// Origin restriction is a transport-layer concern: only the configured
/// client origin passes the CORS layer, handlers never look at origins.
/// An origin that does not parse fails router construction rather than
/// widening the policy.
pub fn create_router(state: Arc<AppState>, config: &ServerConfig) -> crate::Result<Router> {
    let origin = config.client_origin.parse::<HeaderValue>().map_err(|_| {
        StarError::ConfigError(format!(
            "invalid client origin: {:?}",
            config.client_origin
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .route("/bulk_predict", post(handlers::bulk_predict))
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_size))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
