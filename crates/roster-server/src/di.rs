//! Dependency injection module using Shaku.
//!
//! `RosterModule` wires the record store, the cache and the user service.
//! Connection pools are created outside the module and handed in as
//! component parameters.

use deadpool_redis::{Pool, PoolConfig, Runtime};
use metrics_exporter_prometheus::PrometheusHandle;
use roster_config::{AppConfig, CacheConfig};
use roster_core::HealthCheck;
use roster_repository::{
    DatabaseHealth, DatabasePool, DatabasePoolInterface, DatabasePoolParameters, PgUserRepository,
};
use roster_rest::AppState;
use roster_service::{
    CacheHealth, CacheStore, RedisCacheService, RedisCacheServiceParameters, UserService,
    UserServiceImpl, UserServiceImplParameters,
};
use shaku::{module, HasComponent};
use std::sync::Arc;
use tracing::{info, warn};

module! {
    pub RosterModule {
        components = [
            DatabasePool,
            PgUserRepository,
            RedisCacheService,
            UserServiceImpl,
        ],
        providers = [],
    }
}

/// Creates the Redis pool, or `None` when caching is disabled.
///
/// Deadpool connects lazily, so an unreachable server is not an error here;
/// a malformed URL is logged and disables the cache.
pub fn create_cache_pool(config: &CacheConfig) -> Option<Arc<Pool>> {
    if !config.enabled {
        info!("Cache disabled; every read goes to the database");
        return None;
    }

    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    redis_cfg.pool = Some(PoolConfig::new(config.pool_size as usize));

    match redis_cfg.create_pool(Some(Runtime::Tokio1)) {
        Ok(pool) => {
            info!("Redis cache pool created for {}", config.url);
            Some(Arc::new(pool))
        }
        Err(e) => {
            warn!("Failed to create Redis pool, running without cache: {}", e);
            None
        }
    }
}

/// Builds the module around already-created pools.
pub fn build_module(
    db_pool: DatabasePool,
    cache_pool: Option<Arc<Pool>>,
    config: &AppConfig,
) -> Arc<RosterModule> {
    let module = RosterModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.into_inner(),
        })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
            pool: cache_pool,
            operation_timeout: config.cache.operation_timeout(),
        })
        .with_component_parameters::<UserServiceImpl>(UserServiceImplParameters {
            ttl: config.cache.ttl(),
        })
        .build();

    Arc::new(module)
}

/// Resolves the handler state from the module.
pub fn app_state(module: &RosterModule, metrics: Option<PrometheusHandle>) -> AppState {
    let user_service: Arc<dyn UserService> = module.resolve();
    let db_pool: Arc<dyn DatabasePoolInterface> = module.resolve();
    let cache: Arc<dyn CacheStore> = module.resolve();

    let database: Arc<dyn HealthCheck> = Arc::new(DatabaseHealth::new(db_pool));
    let cache: Arc<dyn HealthCheck> = Arc::new(CacheHealth::new(cache));

    let state = AppState::new(user_service)
        .with_health_check(database)
        .with_health_check(cache);

    match metrics {
        Some(handle) => state.with_metrics(handle),
        None => state,
    }
}
