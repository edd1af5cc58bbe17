//! nowplay-proxy library - Status Proxy service
//!
//! Bridges the status widget to the Spotify Web API: exchanges a stored
//! refresh token for a short-lived access token, queries currently-playing
//! state, and serves the normalized result with short-lived cache
//! directives. Stateless per request; nothing is persisted.

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod spotify;

use spotify::SpotifyClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Upstream Spotify client (credentials resolved at startup)
    pub spotify: Arc<SpotifyClient>,
}

impl AppState {
    /// Create new application state
    pub fn new(spotify: Arc<SpotifyClient>) -> Self {
        Self { spotify }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/spotify-now-playing", get(api::now_playing))
        .merge(api::health_routes())
        .with_state(state)
        // The widget page may be served from a different origin
        .layer(CorsLayer::permissive())
}
