use crate::handlers::{authors, books, catalog, health, stats};
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post, put};
use tower_http::trace::TraceLayer;

/// Covers larger than this are refused
pub const MAX_COVER_BYTES: usize = 10 * 1024 * 1024;

/// Create the router with every API route
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/catalog", get(catalog::get_catalog))
        .route("/api/books", post(books::register_book))
        .route(
            "/api/books/{id}",
            get(catalog::get_book).put(books::edit_book),
        )
        .route("/api/books/{id}/status", patch(books::change_status))
        .route(
            "/api/books/{id}/cover",
            put(books::upload_cover).layer(DefaultBodyLimit::max(MAX_COVER_BYTES)),
        )
        .route(
            "/api/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/api/categories",
            get(authors::list_categories).post(authors::create_category),
        )
        .route("/api/stats", get(stats::get_stats))
        .route("/api/calendar", get(stats::get_calendar))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
