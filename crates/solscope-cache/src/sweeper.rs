//! Background eviction of expired cache entries.

use crate::{BoundaryMetrics, TtlCache};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Periodically purges dead entries from a [`TtlCache`].
///
/// Lookups never depend on the sweep; it only bounds memory.
pub struct CacheSweeper {
    cache: Arc<TtlCache>,
    period: Duration,
    shutdown_tx: broadcast::Sender<()>,
    running: Arc<AtomicBool>,
}

impl CacheSweeper {
    /// Creates a sweeper for `cache` running every `period`.
    #[must_use]
    pub fn new(cache: Arc<TtlCache>, period: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            cache,
            period,
            shutdown_tx,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts the sweep loop on the current runtime.
    ///
    /// Returns `None` if the loop is already running.
    pub fn spawn(&self) -> Option<JoinHandle<()>> {
        if self.running.swap(true, Ordering::SeqCst) {
            return None;
        }

        let cache = Arc::clone(&self.cache);
        let running = Arc::clone(&self.running);
        let period = self.period;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        info!(period_secs = period.as_secs(), "Starting cache sweeper");

        Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Cache sweeper stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        let evicted = cache.purge_expired();
                        let remaining = cache.len();
                        BoundaryMetrics::cache_swept(evicted, remaining);
                        debug!(evicted, remaining, "Cache sweep complete");
                    }
                }
            }

            running.store(false, Ordering::SeqCst);
        }))
    }

    /// Signals the loop to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Returns true while the loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
