//! Declarative render output
//!
//! `RenderFrame` is the widget's render result: a plain value describing
//! what should be on screen, independent of any rendering technology. The
//! terminal binary prints it; tests assert on it.

use nowplay_common::PlaybackStatus;
use std::fmt;

/// Caption shown while the first poll is unresolved
pub const LOADING_CAPTION: &str = "Loading status...";
/// Caption shown when nothing is playing
pub const IDLE_CAPTION: &str = "Making the perfect playlist";

/// Which of the three mutually exclusive tiles is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Loading,
    Idle,
    Playing,
}

/// One rendered widget frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub tile: TileKind,
    /// Caption text for loading/idle, track title when playing
    pub caption: String,
    /// Artist line, playing tile only
    pub artist: Option<String>,
    /// Album art location, playing tile only
    pub album_art: Option<String>,
    /// Deep link wrapping the whole tile, playing tile only
    pub link: Option<String>,
    /// Live pulse indicator; decorative, always on while playing
    pub pulse: bool,
    /// Whether the art crossfade retriggered this frame
    pub art_refreshed: bool,
    /// Whether the title/artist transition retriggered this frame
    pub text_refreshed: bool,
}

impl RenderFrame {
    pub fn loading() -> Self {
        Self {
            tile: TileKind::Loading,
            caption: LOADING_CAPTION.to_string(),
            artist: None,
            album_art: None,
            link: None,
            pulse: false,
            art_refreshed: false,
            text_refreshed: false,
        }
    }

    pub fn idle() -> Self {
        Self {
            tile: TileKind::Idle,
            caption: IDLE_CAPTION.to_string(),
            artist: None,
            album_art: None,
            link: None,
            pulse: false,
            art_refreshed: false,
            text_refreshed: false,
        }
    }

    pub fn playing(status: &PlaybackStatus, art_refreshed: bool, text_refreshed: bool) -> Self {
        Self {
            tile: TileKind::Playing,
            caption: status.title.clone().unwrap_or_default(),
            artist: status.artist.clone(),
            album_art: status.album_art.clone(),
            link: status.song_url.clone(),
            pulse: true,
            art_refreshed,
            text_refreshed,
        }
    }
}

impl fmt::Display for RenderFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tile {
            TileKind::Loading => write!(f, "(~) {}", self.caption),
            TileKind::Idle => write!(f, "[ ] {}", self.caption),
            TileKind::Playing => {
                writeln!(f, "[>] {}", self.caption)?;
                if let Some(artist) = &self.artist {
                    writeln!(f, "    by {}", artist)?;
                }
                if let Some(link) = &self.link {
                    write!(f, "    {}", link)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_frame_has_fixed_caption() {
        let frame = RenderFrame::loading();
        assert_eq!(frame.tile, TileKind::Loading);
        assert_eq!(frame.caption, "Loading status...");
    }

    #[test]
    fn idle_frame_has_fixed_caption() {
        let frame = RenderFrame::idle();
        assert_eq!(frame.tile, TileKind::Idle);
        assert_eq!(frame.caption, "Making the perfect playlist");
        assert!(frame.link.is_none());
    }

    #[test]
    fn playing_frame_carries_track_fields() {
        let status = PlaybackStatus::playing(
            "Song",
            "Artist",
            "https://i.scdn.co/image/abc",
            "https://open.spotify.com/track/xyz",
            "2025-06-01T12:00:00Z",
        );
        let frame = RenderFrame::playing(&status, true, true);
        assert_eq!(frame.tile, TileKind::Playing);
        assert_eq!(frame.caption, "Song");
        assert_eq!(frame.artist.as_deref(), Some("Artist"));
        assert_eq!(frame.link.as_deref(), Some("https://open.spotify.com/track/xyz"));
        assert!(frame.pulse);
    }

    #[test]
    fn display_renders_playing_tile_with_link() {
        let status = PlaybackStatus::playing("Song", "Artist", "art", "https://open/song", "t");
        let text = RenderFrame::playing(&status, false, false).to_string();
        assert!(text.contains("Song"));
        assert!(text.contains("by Artist"));
        assert!(text.contains("https://open/song"));
    }
}
