//! Caching infrastructure for the service layer.
//!
//! This module provides the cache contract, a Redis implementation and the
//! cache-aside engine the entity services are built on.

mod cache_aside;
mod cache_interface;
pub mod cache_keys;
mod redis_cache;

pub use cache_aside::{CacheAside, INVALIDATION_TIMEOUT};
pub use cache_interface::{CacheExt, CacheInterface};
pub use redis_cache::RedisCacheService;
