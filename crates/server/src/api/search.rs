//! Live site search API handler.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::handlers::{api_error, bad_request, ApiError};
use super::popular::BookListResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

/// GET /api/v1/search?query=
///
/// Search the remote site. Results are not cached.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<BookListResponse>, ApiError> {
    let query = params.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(bad_request("Search query is required"));
    }

    state
        .catalog()
        .search_site(&query)
        .await
        .map(|books| Json(books.into()))
        .map_err(api_error)
}
