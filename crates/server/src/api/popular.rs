//! Popular listing API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shelf_core::Book;

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub books: Vec<Book>,
    pub total: usize,
}

impl From<Vec<Book>> for BookListResponse {
    fn from(books: Vec<Book>) -> Self {
        let total = books.len();
        Self { books, total }
    }
}

/// GET /api/v1/popular
///
/// The cached popular list, fetched on first use.
pub async fn get_popular(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookListResponse>, ApiError> {
    state
        .catalog()
        .popular()
        .await
        .map(|books| Json(books.into()))
        .map_err(api_error)
}

/// POST /api/v1/popular/refresh
///
/// Re-fetch the popular list. On failure the previous list stays cached.
pub async fn refresh_popular(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookListResponse>, ApiError> {
    state
        .catalog()
        .refresh_popular()
        .await
        .map(|books| Json(books.into()))
        .map_err(api_error)
}

/// GET /api/v1/popular/filter?query=
///
/// Case-insensitive title filter over the cached list. Never fetches.
pub async fn filter_popular(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Json<BookListResponse> {
    let query = params.query.unwrap_or_default();
    Json(state.catalog().filter_popular(&query).await.into())
}
