//! Browser page and htmx fragment handlers.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use shelf_core::{Book, CatalogError};
use tracing::warn;

use super::handlers::status_for;
use crate::pages::{self, MessageKind};
use crate::state::AppState;

/// htmx event that makes the memorized list reload itself.
const MEMORIZED_CHANGED: &str = "memorized-changed";

#[derive(Debug, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MemorizeForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    #[serde(default)]
    pub title: Option<String>,
}

fn error_fragment(e: &CatalogError) -> Response {
    (
        status_for(e.kind()),
        Html(pages::render_message(MessageKind::Error, &e.to_string())),
    )
        .into_response()
}

fn bad_request_fragment(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html(pages::render_message(MessageKind::Error, message)),
    )
        .into_response()
}

/// Return `Some(trimmed)` for a present, non-blank form field.
fn required(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /
///
/// Full page. A failed popular fetch renders an error status instead of the
/// page; a failed memorized load renders the page with an empty shelf.
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let popular = match state.catalog().popular().await {
        Ok(books) => books,
        Err(e) => return error_fragment(&e),
    };
    let memorized = state.catalog().memorized().unwrap_or_else(|e| {
        warn!(error = %e, "Rendering page without memorized books");
        Vec::new()
    });

    Html(pages::render_index(&popular, &memorized)).into_response()
}

/// GET|POST /search
///
/// Filter the cached popular list by the `search` field.
pub async fn filter(State(state): State<Arc<AppState>>, Form(form): Form<FilterForm>) -> Response {
    let query = form.search.unwrap_or_default();
    let books = state.catalog().filter_popular(&query).await;
    Html(pages::render_book_list(&books)).into_response()
}

/// GET|POST /refresh
pub async fn refresh(State(state): State<Arc<AppState>>) -> Response {
    match state.catalog().refresh_popular().await {
        Ok(books) => Html(pages::render_book_list(&books)).into_response(),
        Err(e) => error_fragment(&e),
    }
}

/// POST /search-books
///
/// Live site search by the `query` field.
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Response {
    let Some(query) = required(form.query) else {
        return bad_request_fragment("Search query is required");
    };

    match state.catalog().search_site(&query).await {
        Ok(books) => {
            let memorized = memorized_titles(&state, &books);
            Html(pages::render_search_results(&books, &memorized)).into_response()
        }
        Err(e) => error_fragment(&e),
    }
}

/// Titles among `books` that are already on the shelf. A store failure
/// only loses the tags.
fn memorized_titles(state: &AppState, books: &[Book]) -> HashSet<String> {
    let mut titles = HashSet::new();
    for book in books {
        match state.catalog().is_memorized(&book.title) {
            Ok(true) => {
                titles.insert(book.title.clone());
            }
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "Failed to check memorized titles");
                break;
            }
        }
    }
    titles
}

/// POST /memorize-book
pub async fn memorize_book(
    State(state): State<Arc<AppState>>,
    Form(form): Form<MemorizeForm>,
) -> Response {
    let (Some(title), Some(link)) = (required(form.title), required(form.link)) else {
        return bad_request_fragment("Title and link are required");
    };

    match state.catalog().memorize(&Book::new(title, link)) {
        Ok(_) => (
            [("HX-Trigger", MEMORIZED_CHANGED)],
            Html(pages::render_message(
                MessageKind::Success,
                "Book memorized successfully",
            )),
        )
            .into_response(),
        Err(e) => error_fragment(&e),
    }
}

/// GET /memorized-books
pub async fn memorized_books(State(state): State<Arc<AppState>>) -> Response {
    match state.catalog().memorized() {
        Ok(entries) => Html(pages::render_memorized_list(&entries)).into_response(),
        Err(e) => error_fragment(&e),
    }
}

/// POST /remove-memorized-book
///
/// Responds with the updated memorized list.
pub async fn remove_memorized_book(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RemoveForm>,
) -> Response {
    let Some(title) = required(form.title) else {
        return bad_request_fragment("Title is required");
    };

    if let Err(e) = state.catalog().forget(&title) {
        return error_fragment(&e);
    }
    memorized_books(State(state)).await
}
