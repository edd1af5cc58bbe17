//! Normalized playback status model
//!
//! `PlaybackStatus` is the single domain entity exchanged between the proxy
//! and the widget. It is synthesized fresh per proxy response and replaced
//! wholesale on each successful widget poll.

use serde::{Deserialize, Serialize};

/// Snapshot of current music-playback state.
///
/// Two shapes appear on the wire:
/// - Idle: `{"isPlaying": false}` and nothing else
/// - Playing: all five optional fields populated
///
/// Consumers must tolerate both and never assume the optional fields are
/// present when `is_playing` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStatus {
    /// Whether a track is currently playing
    pub is_playing: bool,

    /// Track name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Artist names joined with ", "
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    /// First (largest) album image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_art: Option<String>,

    /// External deep link to the track
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_url: Option<String>,

    /// RFC 3339 timestamp set at proxy response time.
    ///
    /// Absent on the no-session branch; present on the playing branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl PlaybackStatus {
    /// Idle status: no active playback, no other fields
    pub fn idle() -> Self {
        Self {
            is_playing: false,
            title: None,
            artist: None,
            album_art: None,
            song_url: None,
            timestamp: None,
        }
    }

    /// Playing status with all track fields populated
    pub fn playing(
        title: impl Into<String>,
        artist: impl Into<String>,
        album_art: impl Into<String>,
        song_url: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            is_playing: true,
            title: Some(title.into()),
            artist: Some(artist.into()),
            album_art: Some(album_art.into()),
            song_url: Some(song_url.into()),
            timestamp: Some(timestamp.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_serializes_to_single_field() {
        let json = serde_json::to_value(PlaybackStatus::idle()).unwrap();
        assert_eq!(json, serde_json::json!({ "isPlaying": false }));
    }

    #[test]
    fn playing_serializes_camel_case() {
        let status = PlaybackStatus::playing(
            "Song",
            "Artist One, Artist Two",
            "https://i.scdn.co/image/abc",
            "https://open.spotify.com/track/xyz",
            "2025-06-01T12:00:00Z",
        );
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["isPlaying"], true);
        assert_eq!(json["title"], "Song");
        assert_eq!(json["artist"], "Artist One, Artist Two");
        assert_eq!(json["albumArt"], "https://i.scdn.co/image/abc");
        assert_eq!(json["songUrl"], "https://open.spotify.com/track/xyz");
        assert_eq!(json["timestamp"], "2025-06-01T12:00:00Z");
    }

    #[test]
    fn idle_shape_deserializes_with_absent_fields() {
        let status: PlaybackStatus = serde_json::from_str(r#"{"isPlaying":false}"#).unwrap();
        assert!(!status.is_playing);
        assert!(status.title.is_none());
        assert!(status.artist.is_none());
        assert!(status.album_art.is_none());
        assert!(status.song_url.is_none());
        assert!(status.timestamp.is_none());
    }

    #[test]
    fn round_trip_preserves_equality() {
        let status = PlaybackStatus::playing("A", "B", "C", "D", "E");
        let json = serde_json::to_string(&status).unwrap();
        let back: PlaybackStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, back);
    }
}
