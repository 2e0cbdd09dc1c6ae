//! encore-web library - HTTP service for the Encore booking directory
//!
//! Exposes the JSON API consumed by the static HTML/JS shell: listings,
//! search, detail views, and the create/edit/delete form protocol for
//! venues, artists, and shows.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod views;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Secret behind anti-forgery form tokens
    pub form_secret: i64,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, form_secret: i64) -> Self {
        Self { db, form_secret }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let venues = Router::new()
        .route(
            "/api/venues",
            get(api::venues::list_venues).post(api::venues::create_venue),
        )
        .route("/api/venues/search", get(api::venues::search_venues))
        .route("/api/venues/new", get(api::venues::new_venue_form))
        .route(
            "/api/venues/:id",
            get(api::venues::venue_detail)
                .post(api::venues::edit_venue)
                .delete(api::venues::delete_venue),
        )
        .route("/api/venues/:id/edit", get(api::venues::edit_venue_form));

    let artists = Router::new()
        .route(
            "/api/artists",
            get(api::artists::list_artists).post(api::artists::create_artist),
        )
        .route("/api/artists/search", get(api::artists::search_artists))
        .route("/api/artists/new", get(api::artists::new_artist_form))
        .route(
            "/api/artists/:id",
            get(api::artists::artist_detail)
                .post(api::artists::edit_artist)
                .delete(api::artists::delete_artist),
        )
        .route("/api/artists/:id/edit", get(api::artists::edit_artist_form));

    let shows = Router::new()
        .route(
            "/api/shows",
            get(api::shows::list_shows).post(api::shows::create_show),
        )
        .route("/api/shows/search", get(api::shows::search_shows))
        .route("/api/shows/new", get(api::shows::new_show_form));

    Router::new()
        .route("/api/home/latest", get(api::home::latest))
        .merge(venues)
        .merge(artists)
        .merge(shows)
        .route("/", get(api::ui::serve_index))
        .route("/static/app.js", get(api::ui::serve_app_js))
        .merge(api::health::health_routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Fallback for unknown routes: JSON 404, never a bare framework page
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found" })),
    )
}
