//! Query result cache
//!
//! Holds the latest known result per named query with a configurable
//! staleness window, an in-flight guard per query, and a broadcast channel
//! notifying subscribers on updates. Constructed explicitly and passed to
//! consumers; there is no process-wide singleton.
//!
//! The in-flight guard is what enforces the at-most-one-outstanding-poll
//! rule: a poll tick that finds its query already in flight is skipped
//! instead of piling up concurrent requests. The staleness window lets a
//! freshly attached poller skip its immediate fetch when the cached result
//! is still current.

use nowplay_common::PlaybackStatus;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, RwLock};

/// Default staleness window, matching the widget poll interval
pub const DEFAULT_STALE_WINDOW: Duration = Duration::from_millis(5000);

#[derive(Debug, Default)]
struct QueryState {
    latest: Option<PlaybackStatus>,
    fetched_at: Option<Instant>,
    in_flight: bool,
}

/// Latest-known-result cache keyed by query name
pub struct QueryCache {
    queries: RwLock<HashMap<String, QueryState>>,
    stale_window: Duration,
    update_tx: broadcast::Sender<String>,
}

impl QueryCache {
    /// Create a cache with the default 5 second staleness window
    pub fn new() -> Self {
        Self::with_stale_window(DEFAULT_STALE_WINDOW)
    }

    /// Create a cache with an explicit staleness window
    pub fn with_stale_window(stale_window: Duration) -> Self {
        let (update_tx, _) = broadcast::channel(32);
        Self {
            queries: RwLock::new(HashMap::new()),
            stale_window,
            update_tx,
        }
    }

    /// Subscribe to update notifications; each message is the name of the
    /// query whose result changed
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.update_tx.subscribe()
    }

    /// Mark a fetch as started. Returns false (and changes nothing) when a
    /// fetch for this query is already outstanding.
    pub async fn begin_fetch(&self, query: &str) -> bool {
        let mut queries = self.queries.write().await;
        let state = queries.entry(query.to_string()).or_default();
        if state.in_flight {
            return false;
        }
        state.in_flight = true;
        true
    }

    /// Store a fetch result, clear the in-flight flag, and notify
    /// subscribers
    pub async fn complete_fetch(&self, query: &str, status: PlaybackStatus) {
        {
            let mut queries = self.queries.write().await;
            let state = queries.entry(query.to_string()).or_default();
            state.latest = Some(status);
            state.fetched_at = Some(Instant::now());
            state.in_flight = false;
        }
        // Ignore send errors (no subscribers is OK)
        let _ = self.update_tx.send(query.to_string());
    }

    /// Clear the in-flight flag without storing a result. The previous
    /// result, if any, stays in place.
    pub async fn abort_fetch(&self, query: &str) {
        let mut queries = self.queries.write().await;
        if let Some(state) = queries.get_mut(query) {
            state.in_flight = false;
        }
    }

    /// Latest known result for a query
    pub async fn latest(&self, query: &str) -> Option<PlaybackStatus> {
        self.queries
            .read()
            .await
            .get(query)
            .and_then(|state| state.latest.clone())
    }

    /// Whether the latest result is within the staleness window. A poller
    /// starting against this cache consults this to decide whether its
    /// immediate first fetch is needed.
    pub async fn is_fresh(&self, query: &str) -> bool {
        self.queries
            .read()
            .await
            .get(query)
            .and_then(|state| state.fetched_at)
            .map(|fetched_at| fetched_at.elapsed() < self.stale_window)
            .unwrap_or(false)
    }

    /// Whether a fetch for this query is currently outstanding
    pub async fn is_in_flight(&self, query: &str) -> bool {
        self.queries
            .read()
            .await
            .get(query)
            .map(|state| state.in_flight)
            .unwrap_or(false)
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
