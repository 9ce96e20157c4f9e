//! Panelcraft — HTTP server.
//!
//! Serves the story page, its JSON mirror and the upstream proxy endpoints.

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

/// Builds the full application router.
pub fn app(state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::page::router())
        .nest("/api", routes::proxy::router())
        .nest("/api/story", routes::story::router())
        .with_state(state)
}
