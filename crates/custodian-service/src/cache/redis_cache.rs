//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use custodian_config::RedisConfig;
use custodian_core::{CustodianError, CustodianResult, HealthCheck, HealthStatus};
use deadpool_redis::{redis::AsyncCommands, Pool, PoolConfig, Runtime};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Redis-based cache service.
///
/// Values are written with `SET key value EX ttl` so every entry expires on
/// its own, regardless of later invalidations.
#[derive(Clone)]
pub struct RedisCacheService {
    /// Redis connection pool.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Builds the connection pool described by `config`.
    ///
    /// Returns a disabled cache when Redis is turned off. Connections are
    /// opened lazily, so an unreachable server surfaces on first use.
    pub fn from_config(config: &RedisConfig) -> CustodianResult<Self> {
        if !config.enabled {
            info!("Redis disabled; every cache lookup will miss");
            return Ok(Self::disabled());
        }

        let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
        redis_cfg.pool = Some(PoolConfig::new(config.pool_size));
        let pool = redis_cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| CustodianError::Cache(format!("Failed to create Redis pool: {}", e)))?;

        info!("Redis connection pool configured");
        Ok(Self::new(Arc::new(pool)))
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> CustodianResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                CustodianError::Cache(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(CustodianError::Cache("Cache is disabled".to_string())),
        }
    }
}

/// Decodes a stored value. Entries are written as UTF-8 JSON, so any other
/// bytes mean the entry is corrupt, not that Redis is unreachable.
fn decode_payload(key: &str, bytes: Option<Vec<u8>>) -> CustodianResult<Option<String>> {
    bytes
        .map(|bytes| {
            String::from_utf8(bytes).map_err(|e| CustodianError::cache_corruption(key, e))
        })
        .transpose()
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> CustodianResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let bytes: Option<Vec<u8>> = conn.get(key).await.map_err(|e| {
            CustodianError::Cache(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &bytes {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        decode_payload(key, bytes)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CustodianResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await.map_err(|e| {
            CustodianError::Cache(format!("Failed to set key '{}': {}", key, e))
        })?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CustodianResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| {
            CustodianError::Cache(format!("Failed to delete key '{}': {}", key, e))
        })?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }
}

#[async_trait]
impl HealthCheck for RedisCacheService {
    fn name(&self) -> &str {
        "cache"
    }

    /// A disabled or unreachable cache only degrades the service; reads fall
    /// back to the record store.
    async fn check(&self) -> HealthStatus {
        if !self.is_enabled() {
            return HealthStatus::Degraded("cache disabled".to_string());
        }

        let mut conn = match self.get_conn().await {
            Ok(conn) => conn,
            Err(e) => return HealthStatus::Degraded(e.to_string()),
        };

        let pong: Result<String, _> = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await;
        match pong {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Degraded(format!("PING failed: {}", e)),
        }
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheAside, CacheExt};
    use crate::test_support::sample_role;
    use custodian_core::{CallContext, Role, RoleId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::Span;

    #[test]
    fn test_disabled_cache() {
        let cache = RedisCacheService::disabled();
        assert!(!cache.is_enabled());
    }

    #[test]
    fn test_from_config_respects_enabled_flag() {
        let config = RedisConfig {
            enabled: false,
            ..RedisConfig::default()
        };
        assert!(!RedisCacheService::from_config(&config).unwrap().is_enabled());

        let config = RedisConfig::default();
        assert!(RedisCacheService::from_config(&config).unwrap().is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_cache_always_misses() {
        let cache = RedisCacheService::disabled();
        cache
            .set("custodian:cache:role:1", &"admin", Duration::from_secs(60))
            .await
            .unwrap();
        let value: Option<String> = cache.get("custodian:cache:role:1").await.unwrap();
        assert!(value.is_none());
        assert!(!cache.delete("custodian:cache:role:1").await.unwrap());
    }

    #[test]
    fn test_decode_payload() {
        assert_eq!(decode_payload("k", None).unwrap(), None);
        assert_eq!(
            decode_payload("k", Some(b"{\"id\":1}".to_vec())).unwrap(),
            Some("{\"id\":1}".to_string())
        );
    }

    #[test]
    fn test_decode_invalid_utf8_is_corruption() {
        let err = decode_payload("custodian:cache:role:1", Some(vec![0xff, 0xfe, b'{'])).unwrap_err();
        match err {
            CustodianError::CacheCorruption { key, .. } => assert_eq!(key, "custodian:cache:role:1"),
            other => panic!("Expected CacheCorruption, got {other:?}"),
        }
    }

    /// Cache whose single stored entry holds raw bytes, decoded the way the
    /// Redis adapter decodes them.
    struct RawBytesCache(Vec<u8>);

    #[async_trait]
    impl CacheInterface for RawBytesCache {
        async fn get_raw(&self, key: &str) -> CustodianResult<Option<String>> {
            decode_payload(key, Some(self.0.clone()))
        }

        async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> CustodianResult<()> {
            Ok(())
        }

        async fn delete(&self, _key: &str) -> CustodianResult<bool> {
            Ok(true)
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_invalid_utf8_entry_surfaces_through_read() {
        let cache: Arc<dyn CacheInterface> = Arc::new(RawBytesCache(vec![0xff, 0xfe, b'{']));
        let aside: CacheAside<Role> = CacheAside::new(cache, Duration::from_secs(600), Span::none());
        let loads = AtomicUsize::new(0);

        let result = aside
            .read(&CallContext::background(), RoleId::new(1), || {
                loads.fetch_add(1, Ordering::SeqCst);
                std::future::ready(Ok(Some(sample_role(1, "admin"))))
            })
            .await;

        assert!(matches!(result, Err(CustodianError::CacheCorruption { .. })));
        assert_eq!(loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_disabled_cache_reports_degraded() {
        let status = RedisCacheService::disabled().check().await;
        assert!(matches!(status, HealthStatus::Degraded(_)));
    }
}
