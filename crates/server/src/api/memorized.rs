//! Memorized shelf API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shelf_core::{Book, MemorizedBook};

use super::handlers::{api_error, ApiError, SuccessResponse};
use crate::state::AppState;

/// Missing fields read as empty so they fail validation with a 400.
#[derive(Debug, Deserialize)]
pub struct MemorizeRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct MemorizedListResponse {
    pub books: Vec<MemorizedBook>,
    pub total: usize,
}

/// GET /api/v1/memorized
///
/// Memorized books, newest first.
pub async fn list_memorized(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MemorizedListResponse>, ApiError> {
    let books = state.catalog().memorized().map_err(api_error)?;
    let total = books.len();
    Ok(Json(MemorizedListResponse { books, total }))
}

/// POST /api/v1/memorized
pub async fn memorize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MemorizeRequest>,
) -> Result<(StatusCode, Json<MemorizedBook>), ApiError> {
    let book = Book::new(request.title, request.link);
    let entry = state.catalog().memorize(&book).map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/v1/memorized/{title}
pub async fn forget(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.catalog().forget(&title).map_err(api_error)?;
    Ok(Json(SuccessResponse {
        message: format!("Removed '{}'", title.trim()),
    }))
}
