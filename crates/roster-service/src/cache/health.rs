use super::CacheStore;
use async_trait::async_trait;
use roster_core::{HealthCheck, HealthStatus};
use std::sync::Arc;

/// Reports cache reachability.
///
/// The cache is optional, so a failed ping is `Degraded`, never `Unhealthy`.
pub struct CacheHealth {
    cache: Arc<dyn CacheStore>,
}

impl CacheHealth {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl HealthCheck for CacheHealth {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        if !self.cache.is_enabled() {
            return HealthStatus::Degraded("cache disabled".to_string());
        }
        match self.cache.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Degraded(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{InMemoryCache, RedisCacheService};

    #[tokio::test]
    async fn test_reachable_cache_is_healthy() {
        let health = CacheHealth::new(Arc::new(InMemoryCache::new()));
        assert_eq!(health.name(), "cache");
        assert_eq!(health.check().await, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_disabled_cache_is_degraded_not_unhealthy() {
        let health = CacheHealth::new(Arc::new(RedisCacheService::disabled()));
        let status = health.check().await;
        assert!(!status.is_healthy());
        assert!(!status.is_unhealthy());
    }
}
