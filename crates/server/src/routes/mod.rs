//! HTTP route handlers and router assembly.
//!
//! # Route Structure
//!
//! ```text
//! GET /health                              - Health check
//!
//! # Catalog
//! GET /catalog/items                       - Placeholder item list
//! GET /catalog/sheet?url=                  - Google Sheet rows as JSON
//! GET /catalog/photos?shareUrl=&code=      - Legacy categorized photo slots
//! GET /catalog/produtos/{codigo}/imagens?shareUrl= - All image variants
//!
//! # OAuth
//! GET /auth/login                          - Redirect to Microsoft login
//! GET /auth/callback?code=&error=          - OAuth callback
//!
//! Anything else falls through to the static frontend with an index.html
//! fallback, so the single-page app handles its own routing.
//! ```

pub mod auth;
pub mod catalog;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the catalog routes router, mounted under `/catalog`.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(catalog::items))
        .route("/sheet", get(catalog::sheet_data))
        .route("/photos", get(catalog::photos))
        .route("/produtos/{codigo}/imagens", get(catalog::product_images))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
}

/// Assemble the full application router. API routes take precedence; the
/// static frontend is the fallback.
pub fn app(state: AppState) -> Router {
    let frontend_dir = state.config().frontend_dir.clone();
    let spa = ServeDir::new(&frontend_dir)
        .not_found_service(ServeFile::new(frontend_dir.join("index.html")));

    Router::new()
        .route("/health", get(health))
        .nest("/catalog", catalog_routes())
        .merge(auth_routes())
        .fallback_service(spa)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
