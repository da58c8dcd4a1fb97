use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use shelf_core::{CatalogError, CatalogErrorKind, SanitizedConfig};
use std::sync::Arc;

use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Whether a popular snapshot is currently held.
    pub popular_cached: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// Error half of every JSON handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// HTTP status for a catalog failure.
pub fn status_for(kind: CatalogErrorKind) -> StatusCode {
    match kind {
        CatalogErrorKind::FetchFailure => StatusCode::BAD_GATEWAY,
        CatalogErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        CatalogErrorKind::DuplicateTitle => StatusCode::CONFLICT,
        CatalogErrorKind::NotFound => StatusCode::NOT_FOUND,
        CatalogErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn api_error(e: CatalogError) -> ApiError {
    (
        status_for(e.kind()),
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let popular_cached = !state.catalog().popular_cache().is_empty().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        popular_cached,
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
