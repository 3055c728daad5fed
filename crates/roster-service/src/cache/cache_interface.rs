//! Cache interface trait for abstracted caching operations.

use crate::metrics::CacheMetrics;
use async_trait::async_trait;
use roster_core::RosterResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shaku::Interface;
use std::time::Duration;
use tracing::{debug, warn};

/// Key-value store with per-key expiry.
///
/// Values are JSON text. Implementations report every failure (connection,
/// timeout, protocol) as an error; [`CacheExt`] decides what to do with it.
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> RosterResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RosterResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> RosterResult<bool>;

    /// Lists every key currently starting with `prefix`.
    async fn scan_prefix(&self, prefix: &str) -> RosterResult<Vec<String>>;

    /// Round-trips to the backing service.
    async fn ping(&self) -> RosterResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Result of consulting the cache for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    /// A decodable value was stored under the key.
    Hit(T),
    /// Nothing usable was stored under the key.
    Miss,
    /// The cache could not answer.
    Unavailable,
}

impl<T> CacheLookup<T> {
    /// Returns the cached value, collapsing `Miss` and `Unavailable`.
    pub fn into_hit(self) -> Option<T> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss | Self::Unavailable => None,
        }
    }

    /// Metric label for this outcome.
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Hit(_) => "hit",
            Self::Miss => "miss",
            Self::Unavailable => "unavailable",
        }
    }
}

/// Typed, infallible helpers over a [`CacheStore`].
///
/// None of these return an error: adapter failures are logged and folded into
/// [`CacheLookup::Unavailable`] or a no-op.
#[async_trait]
pub trait CacheExt: CacheStore {
    /// Reads and decodes `key`.
    ///
    /// A stored value that no longer decodes as `T` counts as a miss and is
    /// deleted so the next read repopulates it.
    async fn lookup<T: DeserializeOwned + Send>(&self, key: &str) -> CacheLookup<T> {
        if !self.is_enabled() {
            return CacheLookup::Unavailable;
        }

        let lookup = match self.get_raw(key).await {
            Ok(Some(json)) => match serde_json::from_str::<T>(&json) {
                Ok(value) => CacheLookup::Hit(value),
                Err(e) => {
                    warn!(key, error = %e, "Discarding undecodable cache entry");
                    if let Err(e) = self.delete(key).await {
                        debug!(key, error = %e, "Could not delete undecodable cache entry");
                    }
                    CacheLookup::Miss
                }
            },
            Ok(None) => CacheLookup::Miss,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, falling back to store");
                CacheLookup::Unavailable
            }
        };

        debug!(key, outcome = lookup.outcome(), "Cache lookup");
        CacheMetrics::lookup(lookup.outcome());
        lookup
    }

    /// Best-effort write of `value` under `key`. Returns whether it was stored.
    async fn store<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "Could not encode value for cache");
                CacheMetrics::write_failed();
                return false;
            }
        };

        match self.set_raw(key, &json, ttl).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Cache write failed, continuing without it");
                CacheMetrics::write_failed();
                false
            }
        }
    }

    /// Best-effort delete of a single key.
    async fn invalidate(&self, key: &str) -> bool {
        if !self.is_enabled() {
            return false;
        }

        match self.delete(key).await {
            Ok(existed) => {
                CacheMetrics::invalidated();
                existed
            }
            Err(e) => {
                warn!(key, error = %e, "Cache invalidation failed");
                false
            }
        }
    }

    /// Deletes every key under `prefix`: enumerate, then delete each.
    ///
    /// Not atomic. A key written while the sweep runs may survive it until
    /// its TTL expires. Returns the number of keys deleted.
    async fn sweep(&self, prefix: &str) -> usize {
        if !self.is_enabled() {
            return 0;
        }

        let keys = match self.scan_prefix(prefix).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(prefix, error = %e, "Cache sweep could not enumerate keys");
                return 0;
            }
        };

        let mut deleted = 0;
        for key in &keys {
            match self.delete(key).await {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => warn!(key = %key, error = %e, "Cache sweep could not delete key"),
            }
        }

        debug!(prefix, found = keys.len(), deleted, "Cache sweep finished");
        CacheMetrics::swept(deleted);
        deleted
    }
}

// Blanket implementation for all CacheStore implementations
impl<T: CacheStore + ?Sized> CacheExt for T {}
