//! Caching infrastructure for the service layer.
//!
//! [`CacheStore`] is the raw adapter seam. [`CacheExt`] layers the typed,
//! failure-absorbing helpers the coordinator uses on top of any store.

mod cache_interface;
pub mod cache_keys;
mod health;
mod memory_cache;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheLookup, CacheStore};
pub use health::CacheHealth;
pub use memory_cache::InMemoryCache;
pub use redis_cache::{
    RedisCacheService, RedisCacheServiceParameters, DEFAULT_OPERATION_TIMEOUT, DEFAULT_TTL,
};
