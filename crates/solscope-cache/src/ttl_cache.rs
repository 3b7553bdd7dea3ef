//! In-memory response cache with per-entry TTL.

use crate::CacheKey;
use parking_lot::Mutex;
use solscope_core::Payload;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Longest lifetime an entry can get, however large the requested TTL.
pub const MAX_ENTRY_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

struct CacheEntry {
    value: Payload,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Thread-safe response cache.
///
/// An entry is served only while `now < expires_at`. Dead entries are
/// dropped lazily on lookup and in bulk by [`TtlCache::purge_expired`].
#[derive(Default)]
pub struct TtlCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl TtlCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached body for `key` if it has not expired.
    pub fn get(&self, key: &CacheKey) -> Option<Payload> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                trace!(key = %key, "Dropped expired cache entry");
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    ///
    /// TTLs beyond [`MAX_ENTRY_TTL`] are capped.
    pub fn put(&self, key: CacheKey, value: Payload, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl.min(MAX_ENTRY_TTL))
            .unwrap_or(now);
        let entry = CacheEntry { value, expires_at };
        self.entries.lock().insert(key, entry);
    }

    /// Removes every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Number of stored entries, including dead ones not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
