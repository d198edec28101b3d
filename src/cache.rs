//! TTL-based memo of price history responses.
//!
//! Entries live in a [`KeyValueStore`] under keys prefixed with
//! [`config::CACHE_PREFIX`] and are stored as `{"timestamp", "data"}` JSON.
//! The cache is best-effort: every storage fault is logged and swallowed, and
//! a disabled cache simply behaves as if every entry were missing.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};

use crate::config;
use crate::error::Result;
use crate::models::{CacheEntry, PriceRecord};
use crate::store::KeyValueStore;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of "now" in milliseconds since the Unix epoch.
pub trait Clock: Send {
    fn now_millis(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start_millis)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// PriceCache
// ---------------------------------------------------------------------------

/// Steps of a cache write. A failed first write purges expired entries and
/// retries once; a second failure gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteStep {
    Write,
    PurgeExpired,
    Retry,
    GiveUp,
}

/// Outcome of [`PriceCache::put`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Stored,
    StoredAfterPurge,
    Dropped,
    Disabled,
}

/// An entry written at `timestamp` is stale once `ttl` has fully elapsed.
fn is_expired(ttl: Duration, timestamp: i64, now: i64) -> bool {
    now.saturating_sub(timestamp) >= ttl.as_millis() as i64
}

/// Memo of fetched price histories keyed by item name.
pub struct PriceCache {
    store: Option<Box<dyn KeyValueStore>>,
    clock: Box<dyn Clock>,
    ttl: Duration,
}

impl PriceCache {
    /// Create a cache over `store` using the wall clock and the default TTL.
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Box::new(SystemClock))
    }

    pub fn with_clock(store: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        Self {
            store: Some(store),
            clock,
            ttl: config::CACHE_TTL,
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            store: None,
            clock: Box::new(SystemClock),
            ttl: config::CACHE_TTL,
        }
    }

    /// Override the time-to-live of entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    fn is_expired(&self, timestamp: i64, now: i64) -> bool {
        is_expired(self.ttl, timestamp, now)
    }

    /// Cached records for `name`, or `None` when missing, expired or unreadable.
    ///
    /// Expired and corrupt entries are removed on the way out.
    pub fn get(&mut self, name: &str) -> Option<Vec<PriceRecord>> {
        let now = self.clock.now_millis();
        let key = config::cache_key(name);
        let ttl = self.ttl;
        let store = self.store.as_mut()?;

        let raw = match store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read for '{}' failed: {}", name, e);
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Corrupt cache entry for '{}': {} -- removing", name, e);
                if let Err(e) = store.remove(&key) {
                    warn!("Failed to remove corrupt cache entry '{}': {}", key, e);
                }
                return None;
            }
        };

        if is_expired(ttl, entry.timestamp, now) {
            debug!("Cache entry for '{}' expired", name);
            if let Err(e) = store.remove(&key) {
                warn!("Failed to remove expired cache entry '{}': {}", key, e);
            }
            return None;
        }

        debug!("Cache hit for '{}'", name);
        Some(entry.data)
    }

    /// Store `data` for `name`, replacing any previous entry.
    ///
    /// Never fails: a write that still fails after purging expired entries is
    /// logged and dropped.
    pub fn put(&mut self, name: &str, data: &[PriceRecord]) -> WriteOutcome {
        if self.store.is_none() {
            return WriteOutcome::Disabled;
        }
        let entry = CacheEntry {
            timestamp: self.clock.now_millis(),
            data: data.to_vec(),
        };
        let payload = match serde_json::to_string(&entry) {
            Ok(p) => p,
            Err(e) => {
                error!("Failed to encode cache entry for '{}': {}", name, e);
                return WriteOutcome::Dropped;
            }
        };
        let key = config::cache_key(name);

        let mut step = WriteStep::Write;
        loop {
            step = match step {
                WriteStep::Write => match self.write(&key, &payload) {
                    Ok(()) => return WriteOutcome::Stored,
                    Err(e) => {
                        warn!("Cache write for '{}' failed: {}", name, e);
                        WriteStep::PurgeExpired
                    }
                },
                WriteStep::PurgeExpired => {
                    self.purge_expired();
                    WriteStep::Retry
                }
                WriteStep::Retry => match self.write(&key, &payload) {
                    Ok(()) => return WriteOutcome::StoredAfterPurge,
                    Err(e) => {
                        error!("Cache write retry for '{}' failed: {}", name, e);
                        WriteStep::GiveUp
                    }
                },
                WriteStep::GiveUp => return WriteOutcome::Dropped,
            };
        }
    }

    fn write(&mut self, key: &str, payload: &str) -> Result<()> {
        match self.store.as_mut() {
            Some(store) => store.set(key, payload),
            None => Ok(()),
        }
    }

    /// Delete every expired or unreadable entry under the cache prefix.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_millis();
        let Some(store) = self.store.as_ref() else {
            return 0;
        };
        let keys = match store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                error!("Failed to list cache entries: {}", e);
                return 0;
            }
        };

        let stale: Vec<String> = keys
            .into_iter()
            .filter(|k| k.starts_with(config::CACHE_PREFIX))
            .filter(|k| match store.get(k) {
                Ok(Some(raw)) => match serde_json::from_str::<CacheEntry>(&raw) {
                    Ok(entry) => self.is_expired(entry.timestamp, now),
                    Err(_) => true,
                },
                Ok(None) => false,
                Err(e) => {
                    warn!("Cache read for '{}' failed during purge: {}", k, e);
                    false
                }
            })
            .collect();

        let mut removed = 0;
        if let Some(store) = self.store.as_mut() {
            for key in &stale {
                match store.remove(key) {
                    Ok(()) => removed += 1,
                    Err(e) => warn!("Failed to remove cache entry '{}': {}", key, e),
                }
            }
        }
        if removed > 0 {
            debug!("Purged {} expired cache entries", removed);
        }
        removed
    }

    /// Remove every entry under the cache prefix, fresh or not.
    pub fn clear(&mut self) -> usize {
        let Some(store) = self.store.as_mut() else {
            return 0;
        };
        let keys = match store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                error!("Failed to list cache entries: {}", e);
                return 0;
            }
        };
        keys.iter()
            .filter(|k| k.starts_with(config::CACHE_PREFIX))
            .filter(|k| store.remove(k).is_ok())
            .count()
    }
}
