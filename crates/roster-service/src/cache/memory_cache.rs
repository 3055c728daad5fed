//! In-process cache with per-key expiry.

use super::CacheStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use roster_core::RosterResult;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A [`CacheStore`] backed by a `HashMap`.
///
/// Expired entries are dropped lazily on access.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    /// Returns true when no live entry exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `key` holds a live entry.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .lock()
            .get(key)
            .is_some_and(|(_, expires_at)| *expires_at > Instant::now())
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> RosterResult<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RosterResult<()> {
        let expires_at = Instant::now() + ttl;
        self.entries
            .lock()
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    async fn delete(&self, key: &str) -> RosterResult<bool> {
        Ok(self.entries.lock().remove(key).is_some())
    }

    async fn scan_prefix(&self, prefix: &str) -> RosterResult<Vec<String>> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .iter()
            .filter(|(key, (_, expires_at))| key.starts_with(prefix) && *expires_at > now)
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort_unstable();
        Ok(keys)
    }

    async fn ping(&self) -> RosterResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheExt, CacheLookup};

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = InMemoryCache::new();
        cache.set_raw("user:1", "{}", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get_raw("user:1").await.unwrap().as_deref(), Some("{}"));
        assert!(cache.delete("user:1").await.unwrap());
        assert!(!cache.delete("user:1").await.unwrap());
        assert_eq!(cache.get_raw("user:1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entries_are_absent() {
        let cache = InMemoryCache::new();
        cache.set_raw("user:1", "{}", Duration::ZERO).await.unwrap();

        assert_eq!(cache.get_raw("user:1").await.unwrap(), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_scan_prefix_is_literal() {
        let cache = InMemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set_raw("users:skip:0:limit:10", "[]", ttl).await.unwrap();
        cache.set_raw("users:search:a:skip:0:limit:10", "[]", ttl).await.unwrap();
        cache.set_raw("user:1", "{}", ttl).await.unwrap();

        let keys = cache.scan_prefix("users:").await.unwrap();
        assert_eq!(
            keys,
            vec!["users:search:a:skip:0:limit:10", "users:skip:0:limit:10"]
        );
    }

    #[tokio::test]
    async fn test_sweep_leaves_point_keys() {
        let cache = InMemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set_raw("users:skip:0:limit:10", "[]", ttl).await.unwrap();
        cache.set_raw("users:skip:10:limit:10", "[]", ttl).await.unwrap();
        cache.set_raw("user:1", "{}", ttl).await.unwrap();

        assert_eq!(cache.sweep("users:").await, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains_key("user:1"));
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss_and_removed() {
        let cache = InMemoryCache::new();
        cache
            .set_raw("user:1", "not json", Duration::from_secs(60))
            .await
            .unwrap();

        let lookup: CacheLookup<u32> = cache.lookup("user:1").await;
        assert_eq!(lookup, CacheLookup::Miss);
        assert!(!cache.contains_key("user:1"));
    }

    #[tokio::test]
    async fn test_store_then_lookup_hit() {
        let cache = InMemoryCache::new();
        assert!(cache.store("k", &vec![1, 2, 3], Duration::from_secs(60)).await);

        let lookup: CacheLookup<Vec<i32>> = cache.lookup("k").await;
        assert_eq!(lookup.into_hit(), Some(vec![1, 2, 3]));
    }
}
