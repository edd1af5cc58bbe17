//! Currently-playing status endpoint
//!
//! One top-level guard covers the whole request: every upstream failure
//! (credentials, token exchange, transport, payload shape) collapses to the
//! same generic 500 body so no error detail leaks to the client. Failures
//! are served with caching disabled so they are never cached at the edge.

use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error};

use crate::AppState;
use nowplay_common::time;

/// Browser/edge cache policy for successful responses: fresh for 5 seconds,
/// revalidate-while-stale for 10
const CACHE_CONTROL_SUCCESS: &str = "public, max-age=5, s-maxage=5, stale-while-revalidate=10";
const CDN_CACHE_CONTROL_SUCCESS: &str = "public, max-age=5, s-maxage=5";
const CACHE_CONTROL_FAILURE: &str = "no-store";

fn cdn_cache_control() -> HeaderName {
    HeaderName::from_static("cdn-cache-control")
}

/// Generic error body; detail stays in the server log
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub timestamp: String,
}

/// GET /api/spotify-now-playing
///
/// Relays normalized playback status from Spotify. Stateless: each request
/// performs one token exchange and one status fetch.
pub async fn now_playing(State(state): State<AppState>) -> Response {
    match state.spotify.fetch_now_playing().await {
        Ok(status) => {
            debug!(is_playing = status.is_playing, "Serving playback status");
            (
                StatusCode::OK,
                [
                    (header::CACHE_CONTROL, CACHE_CONTROL_SUCCESS),
                    (cdn_cache_control(), CDN_CACHE_CONTROL_SUCCESS),
                ],
                Json(status),
            )
                .into_response()
        }
        Err(e) => {
            error!("Spotify status fetch failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [
                    (header::CACHE_CONTROL, CACHE_CONTROL_FAILURE),
                    (cdn_cache_control(), CACHE_CONTROL_FAILURE),
                ],
                Json(ErrorBody {
                    error: "Error fetching Spotify data".to_string(),
                    timestamp: time::now_rfc3339(),
                }),
            )
                .into_response()
        }
    }
}
