//! Spotify Web API client
//!
//! Performs the per-request credential exchange (refresh token → bearer
//! token) and the currently-playing fetch, then normalizes the upstream
//! payload into a `PlaybackStatus`. Exactly one token exchange happens per
//! invocation; the bearer token is never cached across requests.

use base64::Engine;
use nowplay_common::config::TomlConfig;
use nowplay_common::{time, PlaybackStatus};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const TOKEN_ENDPOINT: &str = "https://accounts.spotify.com/api/token";
const CURRENTLY_PLAYING_ENDPOINT: &str =
    "https://api.spotify.com/v1/me/player/currently-playing";
const USER_AGENT: &str = "nowplay/0.1.0";
const UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Spotify client errors
///
/// All variants collapse to the same generic 500 response; the distinction
/// exists only for server-side logging.
#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("Spotify credentials not configured")]
    Credentials,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Long-lived credentials read from process configuration at startup
#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
}

impl SpotifyCredentials {
    /// Resolve credentials with ENV → TOML priority.
    ///
    /// Environment variables: `SPOTIFY_REFRESH_TOKEN`, `SPOTIFY_CLIENT_ID`,
    /// `SPOTIFY_CLIENT_SECRET`. The `[spotify]` TOML section is the
    /// fallback for any variable that is unset.
    pub fn resolve(toml_config: &TomlConfig) -> nowplay_common::Result<Self> {
        let section = toml_config.spotify.clone().unwrap_or_default();

        let refresh_token = resolve_value("SPOTIFY_REFRESH_TOKEN", section.refresh_token);
        let client_id = resolve_value("SPOTIFY_CLIENT_ID", section.client_id);
        let client_secret = resolve_value("SPOTIFY_CLIENT_SECRET", section.client_secret);

        match (refresh_token, client_id, client_secret) {
            (Some(refresh_token), Some(client_id), Some(client_secret)) => Ok(Self {
                refresh_token,
                client_id,
                client_secret,
            }),
            _ => Err(nowplay_common::Error::Config(
                "Spotify credentials not configured. Please configure using one of:\n\
                 1. Environment: SPOTIFY_REFRESH_TOKEN, SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET\n\
                 2. TOML config: ~/.config/nowplay/nowplay.toml ([spotify] section)"
                    .to_string(),
            )),
        }
    }
}

fn resolve_value(env_var: &str, toml_value: Option<String>) -> Option<String> {
    std::env::var(env_var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or(toml_value.filter(|v| !v.trim().is_empty()))
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Currently-playing endpoint payload (fields we consume)
#[derive(Debug, Deserialize)]
pub struct CurrentlyPlaying {
    pub is_playing: bool,
    pub item: Option<Track>,
}

#[derive(Debug, Deserialize)]
pub struct Track {
    pub name: String,
    pub artists: Vec<TrackArtist>,
    pub album: Album,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Album {
    pub images: Vec<AlbumImage>,
}

#[derive(Debug, Deserialize)]
pub struct AlbumImage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    credentials: Option<SpotifyCredentials>,
    token_endpoint: String,
    playing_endpoint: String,
}

impl SpotifyClient {
    /// Create a client against the real Spotify endpoints.
    ///
    /// `credentials` may be `None` when configuration is missing; every
    /// fetch then fails with `SpotifyError::Credentials` so the service can
    /// still start and answer with its generic error shape.
    pub fn new(credentials: Option<SpotifyCredentials>) -> Result<Self, SpotifyError> {
        Self::with_endpoints(
            credentials,
            TOKEN_ENDPOINT.to_string(),
            CURRENTLY_PLAYING_ENDPOINT.to_string(),
        )
    }

    /// Create a client against explicit endpoints (tests point this at a
    /// local fake upstream)
    pub fn with_endpoints(
        credentials: Option<SpotifyCredentials>,
        token_endpoint: String,
        playing_endpoint: String,
    ) -> Result<Self, SpotifyError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            credentials,
            token_endpoint,
            playing_endpoint,
        })
    }

    /// Exchange the stored refresh token for a short-lived access token
    async fn exchange_token(
        &self,
        credentials: &SpotifyCredentials,
    ) -> Result<String, SpotifyError> {
        let basic = base64::engine::general_purpose::STANDARD.encode(format!(
            "{}:{}",
            credentials.client_id, credentials.client_secret
        ));

        let response = self
            .http_client
            .post(&self.token_endpoint)
            .header("Authorization", format!("Basic {}", basic))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", credentials.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Api(status.as_u16(), error_text));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SpotifyError::Parse(e.to_string()))?;

        Ok(token.access_token)
    }

    /// Fetch and normalize currently-playing state.
    ///
    /// 204 from upstream means no active playback session and maps to the
    /// bare idle status with no timestamp.
    pub async fn fetch_now_playing(&self) -> Result<PlaybackStatus, SpotifyError> {
        let credentials = self.credentials.as_ref().ok_or(SpotifyError::Credentials)?;
        let token = self.exchange_token(credentials).await?;

        let response = self
            .http_client
            .get(&self.playing_endpoint)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| SpotifyError::Network(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(PlaybackStatus::idle());
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Api(status.as_u16(), error_text));
        }

        let payload: CurrentlyPlaying = response
            .json()
            .await
            .map_err(|e| SpotifyError::Parse(e.to_string()))?;

        normalize(payload, time::now_rfc3339())
    }
}

/// Normalize the upstream payload into a `PlaybackStatus`.
///
/// The upstream `is_playing` flag is passed through, so a paused session
/// (200 with `is_playing=false`) yields the idle shape. When playing, all
/// track fields are required; a payload missing them is a parse failure
/// that surfaces through the generic error path.
pub fn normalize(
    payload: CurrentlyPlaying,
    timestamp: String,
) -> Result<PlaybackStatus, SpotifyError> {
    if !payload.is_playing {
        return Ok(PlaybackStatus::idle());
    }

    let track = payload
        .item
        .ok_or_else(|| SpotifyError::Parse("playing response missing item".to_string()))?;

    let artist = track
        .artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let album_art = track
        .album
        .images
        .first()
        .map(|img| img.url.clone())
        .ok_or_else(|| SpotifyError::Parse("playing response has no album images".to_string()))?;

    Ok(PlaybackStatus::playing(
        track.name,
        artist,
        album_art,
        track.external_urls.spotify,
        timestamp,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn playing_payload(artists: &[&str]) -> CurrentlyPlaying {
        CurrentlyPlaying {
            is_playing: true,
            item: Some(Track {
                name: "Song".to_string(),
                artists: artists
                    .iter()
                    .map(|name| TrackArtist {
                        name: name.to_string(),
                    })
                    .collect(),
                album: Album {
                    images: vec![
                        AlbumImage {
                            url: "https://i.scdn.co/image/large".to_string(),
                        },
                        AlbumImage {
                            url: "https://i.scdn.co/image/small".to_string(),
                        },
                    ],
                },
                external_urls: ExternalUrls {
                    spotify: "https://open.spotify.com/track/xyz".to_string(),
                },
            }),
        }
    }

    #[test]
    fn normalize_playing_fills_all_fields() {
        let status = normalize(playing_payload(&["Artist"]), "2025-06-01T12:00:00Z".into()).unwrap();
        assert!(status.is_playing);
        assert_eq!(status.title.as_deref(), Some("Song"));
        assert_eq!(status.artist.as_deref(), Some("Artist"));
        assert_eq!(status.album_art.as_deref(), Some("https://i.scdn.co/image/large"));
        assert_eq!(
            status.song_url.as_deref(),
            Some("https://open.spotify.com/track/xyz")
        );
        assert_eq!(status.timestamp.as_deref(), Some("2025-06-01T12:00:00Z"));
    }

    #[test]
    fn normalize_joins_multiple_artists_with_comma() {
        let status =
            normalize(playing_payload(&["First", "Second", "Third"]), "t".into()).unwrap();
        assert_eq!(status.artist.as_deref(), Some("First, Second, Third"));
    }

    #[test]
    fn normalize_paused_session_yields_idle_shape() {
        let mut payload = playing_payload(&["Artist"]);
        payload.is_playing = false;
        let status = normalize(payload, "t".into()).unwrap();
        assert_eq!(status, PlaybackStatus::idle());
    }

    #[test]
    fn normalize_missing_item_is_parse_error() {
        let payload = CurrentlyPlaying {
            is_playing: true,
            item: None,
        };
        let err = normalize(payload, "t".into()).unwrap_err();
        assert!(matches!(err, SpotifyError::Parse(_)));
    }

    #[test]
    fn normalize_empty_images_is_parse_error() {
        let mut payload = playing_payload(&["Artist"]);
        payload.item.as_mut().unwrap().album.images.clear();
        let err = normalize(payload, "t".into()).unwrap_err();
        assert!(matches!(err, SpotifyError::Parse(_)));
    }

    #[test]
    fn upstream_payload_deserializes_from_spotify_shape() {
        let json = r#"{
            "is_playing": true,
            "progress_ms": 12345,
            "item": {
                "name": "Song",
                "artists": [{"name": "Artist", "id": "abc"}],
                "album": {"name": "Album", "images": [{"url": "https://i.scdn.co/img", "width": 640}]},
                "external_urls": {"spotify": "https://open.spotify.com/track/xyz"}
            }
        }"#;
        let payload: CurrentlyPlaying = serde_json::from_str(json).unwrap();
        assert!(payload.is_playing);
        assert_eq!(payload.item.unwrap().name, "Song");
    }

    #[test]
    #[serial]
    fn credentials_resolve_prefers_env_over_toml() {
        std::env::set_var("SPOTIFY_REFRESH_TOKEN", "env-rt");
        std::env::set_var("SPOTIFY_CLIENT_ID", "env-id");
        std::env::set_var("SPOTIFY_CLIENT_SECRET", "env-secret");

        let toml_config = nowplay_common::config::TomlConfig {
            spotify: Some(nowplay_common::config::SpotifySection {
                refresh_token: Some("toml-rt".to_string()),
                client_id: Some("toml-id".to_string()),
                client_secret: Some("toml-secret".to_string()),
            }),
            ..Default::default()
        };

        let credentials = SpotifyCredentials::resolve(&toml_config).unwrap();
        assert_eq!(credentials.refresh_token, "env-rt");
        assert_eq!(credentials.client_id, "env-id");
        assert_eq!(credentials.client_secret, "env-secret");

        std::env::remove_var("SPOTIFY_REFRESH_TOKEN");
        std::env::remove_var("SPOTIFY_CLIENT_ID");
        std::env::remove_var("SPOTIFY_CLIENT_SECRET");
    }

    #[test]
    #[serial]
    fn credentials_resolve_falls_back_to_toml() {
        std::env::remove_var("SPOTIFY_REFRESH_TOKEN");
        std::env::remove_var("SPOTIFY_CLIENT_ID");
        std::env::remove_var("SPOTIFY_CLIENT_SECRET");

        let toml_config = nowplay_common::config::TomlConfig {
            spotify: Some(nowplay_common::config::SpotifySection {
                refresh_token: Some("toml-rt".to_string()),
                client_id: Some("toml-id".to_string()),
                client_secret: Some("toml-secret".to_string()),
            }),
            ..Default::default()
        };

        let credentials = SpotifyCredentials::resolve(&toml_config).unwrap();
        assert_eq!(credentials.refresh_token, "toml-rt");
    }

    #[test]
    #[serial]
    fn credentials_resolve_missing_everything_is_config_error() {
        std::env::remove_var("SPOTIFY_REFRESH_TOKEN");
        std::env::remove_var("SPOTIFY_CLIENT_ID");
        std::env::remove_var("SPOTIFY_CLIENT_SECRET");

        let err = SpotifyCredentials::resolve(&TomlConfig::default()).unwrap_err();
        assert!(matches!(err, nowplay_common::Error::Config(_)));
    }
}
