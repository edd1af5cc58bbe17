//! Background status poller
//!
//! Polls the proxy on a fixed interval and feeds results into the query
//! cache. A tick that finds the previous request still outstanding is
//! skipped via the cache's in-flight guard. The immediate fetch on startup
//! is skipped when the injected cache already holds a fresh result, so a
//! restarted widget sharing a cache does not refetch inside the staleness
//! window; interval ticks after that always poll. Cancellation is checked
//! before every cache write so a result racing with teardown is never
//! applied.

use crate::cache::QueryCache;
use crate::client::ProxyClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default poll interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Handle to a running poller task
pub struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling and wait for the task to finish. After this returns,
    /// no further cache writes happen on behalf of this poller.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

/// Spawn the poll loop
pub fn spawn_poller(
    client: ProxyClient,
    cache: Arc<QueryCache>,
    query: impl Into<String>,
    interval: Duration,
) -> PollerHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let query = query.into();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        info!("Status poller started ({:?} interval)", interval);
        let mut first_tick = true;

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if first_tick {
                first_tick = false;
                if cache.is_fresh(&query).await {
                    debug!("Skipping initial poll: cached result still fresh");
                    continue;
                }
            }

            if !cache.begin_fetch(&query).await {
                debug!("Skipping tick: previous poll still in flight");
                continue;
            }

            tokio::select! {
                _ = token.cancelled() => {
                    cache.abort_fetch(&query).await;
                    break;
                }
                result = client.fetch_status() => match result {
                    Ok(status) => {
                        if token.is_cancelled() {
                            cache.abort_fetch(&query).await;
                            break;
                        }
                        cache.complete_fetch(&query, status).await;
                    }
                    Err(e) => {
                        // Stale is better than broken: keep the last result
                        warn!("Status poll failed: {}", e);
                        cache.abort_fetch(&query).await;
                    }
                }
            }
        }

        debug!("Status poller stopped");
    });

    PollerHandle { cancel, task }
}
