use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{handlers, html, memorized, middleware::metrics_middleware, popular, search};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Popular listing (cached)
        .route("/popular", get(popular::get_popular))
        .route("/popular/refresh", post(popular::refresh_popular))
        .route("/popular/filter", get(popular::filter_popular))
        // Live site search (uncached)
        .route("/search", get(search::search))
        // Memorized shelf
        .route("/memorized", get(memorized::list_memorized))
        .route("/memorized", post(memorized::memorize))
        .route("/memorized/{title}", delete(memorized::forget))
        .with_state(Arc::clone(&state));

    // Browser pages and htmx fragments
    let page_routes = Router::new()
        .route("/", get(html::index))
        .route("/search", get(html::filter).post(html::filter))
        .route("/refresh", get(html::refresh).post(html::refresh))
        .route("/search-books", post(html::search_books))
        .route("/memorize-book", post(html::memorize_book))
        .route("/memorized-books", get(html::memorized_books))
        .route("/remove-memorized-book", post(html::remove_memorized_book))
        .route("/metrics", get(handlers::metrics))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .merge(page_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
