//! Status proxy HTTP client

use nowplay_common::PlaybackStatus;
use std::time::Duration;
use thiserror::Error;

const STATUS_PATH: &str = "/api/spotify-now-playing";
const USER_AGENT: &str = "nowplay-widget/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Proxy client errors. The widget never renders these; a failed poll is
/// logged and the previous visual state stays in place.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Proxy error status {0}")]
    Api(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// HTTP client for the status proxy
pub struct ProxyClient {
    http_client: reqwest::Client,
    status_url: String,
}

impl ProxyClient {
    /// Create a client for a proxy at `base_url`
    /// (e.g. `http://127.0.0.1:5750`)
    pub fn new(base_url: &str) -> Result<Self, ProxyError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProxyError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            status_url: format!("{}{}", base_url.trim_end_matches('/'), STATUS_PATH),
        })
    }

    /// Fetch the current playback status
    pub async fn fetch_status(&self) -> Result<PlaybackStatus, ProxyError> {
        let response = self
            .http_client
            .get(&self.status_url)
            .send()
            .await
            .map_err(|e| ProxyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::Api(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| ProxyError::Parse(e.to_string()))
    }
}
