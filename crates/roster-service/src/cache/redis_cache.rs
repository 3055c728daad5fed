//! Redis-based cache implementation.

use super::CacheStore;
use crate::metrics::CacheMetrics;
use async_trait::async_trait;
use deadpool_redis::{redis, redis::AsyncCommands, Pool};
use roster_core::{with_timeout, RosterError, RosterResult};
use shaku::Component;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default TTL for cached items (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default deadline for a single cache call.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(250);

/// Keys requested per SCAN round trip.
const SCAN_BATCH: usize = 100;

/// Redis-based cache service.
///
/// Every round trip, including pool checkout, is bounded by `operation_timeout`.
#[derive(Component)]
#[shaku(interface = CacheStore)]
pub struct RedisCacheService {
    /// Redis connection pool; `None` when caching is disabled.
    pool: Option<Arc<Pool>>,
    /// Deadline applied to each operation.
    #[shaku(default = DEFAULT_OPERATION_TIMEOUT)]
    operation_timeout: Duration,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>, operation_timeout: Duration) -> Self {
        Self {
            pool: Some(pool),
            operation_timeout,
        }
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    fn pool(&self) -> RosterResult<&Pool> {
        self.pool
            .as_deref()
            .ok_or_else(|| RosterError::cache("Cache is disabled"))
    }

    /// Runs `fut` under the operation deadline and records its latency.
    async fn bounded<T, Fut>(&self, op: &'static str, fut: Fut) -> RosterResult<T>
    where
        Fut: Future<Output = RosterResult<T>> + Send,
    {
        let started = Instant::now();
        let result = with_timeout(op, self.operation_timeout, fut).await;
        CacheMetrics::operation(op, started.elapsed(), result.is_ok());
        result
    }
}

async fn get_conn(pool: &Pool) -> RosterResult<deadpool_redis::Connection> {
    pool.get()
        .await
        .map_err(|e| RosterError::cache(format!("Failed to get Redis connection: {e}")))
}

/// Escapes glob metacharacters so `prefix` matches literally in `SCAN MATCH`.
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl CacheStore for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> RosterResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }
        let pool = self.pool()?;

        self.bounded("get", async move {
            let mut conn = get_conn(pool).await?;
            let value: Option<String> = conn.get(key).await.map_err(|e| {
                RosterError::cache(format!("Failed to get key '{key}': {e}"))
            })?;
            Ok(value)
        })
        .await
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> RosterResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        let pool = self.pool()?;
        let ttl_secs = ttl.as_secs().max(1);

        self.bounded("set", async move {
            let mut conn = get_conn(pool).await?;
            conn.set_ex::<_, _, ()>(key, value, ttl_secs)
                .await
                .map_err(|e| RosterError::cache(format!("Failed to set key '{key}': {e}")))?;
            debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> RosterResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }
        let pool = self.pool()?;

        self.bounded("delete", async move {
            let mut conn = get_conn(pool).await?;
            let deleted: i64 = conn.del(key).await.map_err(|e| {
                RosterError::cache(format!("Failed to delete key '{key}': {e}"))
            })?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn scan_prefix(&self, prefix: &str) -> RosterResult<Vec<String>> {
        if !self.is_enabled() {
            return Ok(Vec::new());
        }
        let pool = self.pool()?;
        let pattern = format!("{}*", escape_glob(prefix));

        // The deadline applies per round trip; a large keyspace needs many.
        let mut conn = self.bounded("scan", get_conn(pool)).await?;
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, batch): (u64, Vec<String>) = self
                .bounded("scan", async {
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(&pattern)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query_async(&mut conn)
                        .await
                        .map_err(|e| RosterError::cache(format!("Failed to scan keys: {e}")))
                })
                .await?;

            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }

    async fn ping(&self) -> RosterResult<()> {
        let pool = self.pool()?;

        self.bounded("ping", async move {
            let mut conn = get_conn(pool).await?;
            redis::cmd("PING")
                .query_async::<String>(&mut conn)
                .await
                .map_err(|e| RosterError::cache(format!("PING failed: {e}")))?;
            Ok(())
        })
        .await
    }
}
