//! Three-state widget view model
//!
//! Derives the presentation state from the query cache and sequences the
//! per-element transitions. The text transition is keyed by the
//! title+artist pair, so a title change alone retriggers it; the art
//! crossfade is keyed by the album art URL.

use crate::cache::QueryCache;
use crate::render::RenderFrame;
use crate::transition::{ContentTransition, Transition};
use nowplay_common::PlaybackStatus;
use std::sync::Arc;

/// Query name the widget polls and reads
pub const NOW_PLAYING_QUERY: &str = "spotify-now-playing";

/// Mutually exclusive widget states
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState {
    /// First poll not yet resolved
    Loading,
    /// No track playing
    Idle,
    /// Track playing; holds the latest status wholesale
    Playing(PlaybackStatus),
}

/// The status widget: cache-derived state plus transition trackers
pub struct StatusWidget {
    cache: Arc<QueryCache>,
    query: String,
    tile: ContentTransition,
    art: ContentTransition,
    text: ContentTransition,
}

impl StatusWidget {
    /// Create a widget reading the standard now-playing query
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self::with_query(cache, NOW_PLAYING_QUERY)
    }

    /// Create a widget reading an explicit query name
    pub fn with_query(cache: Arc<QueryCache>, query: impl Into<String>) -> Self {
        Self {
            cache,
            query: query.into(),
            tile: ContentTransition::new(),
            art: ContentTransition::new(),
            text: ContentTransition::new(),
        }
    }

    /// Current state, derived from the cache. A failed poll leaves the
    /// cache untouched, so the last-known state keeps showing.
    pub async fn state(&self) -> WidgetState {
        match self.cache.latest(&self.query).await {
            None => WidgetState::Loading,
            Some(status) if status.is_playing => WidgetState::Playing(status),
            Some(_) => WidgetState::Idle,
        }
    }

    /// Render one frame, advancing the transition trackers
    pub async fn render(&mut self) -> RenderFrame {
        let state = self.state().await;

        match state {
            WidgetState::Loading => {
                self.tile.observe(Some("loading"));
                self.art.observe(None);
                self.text.observe(None);
                RenderFrame::loading()
            }
            WidgetState::Idle => {
                self.tile.observe(Some("idle"));
                self.art.observe(None);
                self.text.observe(None);
                RenderFrame::idle()
            }
            WidgetState::Playing(status) => {
                self.tile.observe(Some("playing"));
                let art_fired = fired(self.art.observe(status.album_art.as_deref()));
                let text_fired = fired(self.text.observe(text_key(&status).as_deref()));
                RenderFrame::playing(&status, art_fired, text_fired)
            }
        }
    }

    /// Total art crossfades fired
    pub fn art_transitions(&self) -> u64 {
        self.art.fired()
    }

    /// Total text transitions fired
    pub fn text_transitions(&self) -> u64 {
        self.text.fired()
    }

    /// Total tile-level transitions fired (loading/idle/playing changes)
    pub fn tile_transitions(&self) -> u64 {
        self.tile.fired()
    }
}

fn fired(transition: Transition) -> bool {
    matches!(transition, Transition::Enter | Transition::Swap)
}

/// Transition key for the text block: the title+artist pair
fn text_key(status: &PlaybackStatus) -> Option<String> {
    match (&status.title, &status.artist) {
        (Some(title), Some(artist)) => Some(format!("{}-{}", title, artist)),
        (Some(title), None) => Some(title.clone()),
        _ => None,
    }
}
