//! Integration tests for RedisCacheService.
//!
//! These tests run against a real Redis server using testcontainers.
//! Requires Docker to be available on the system.

use custodian_config::RedisConfig;
use custodian_core::{CustodianError, HealthCheck, HealthStatus};
use custodian_service::{cache_keys, CacheExt, CacheInterface, RedisCacheService};
use deadpool_redis::redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::redis::Redis;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Cached {
    id: i64,
    name: String,
}

async fn start() -> (ContainerAsync<Redis>, RedisCacheService, deadpool_redis::Pool) {
    let container = Redis::default()
        .start()
        .await
        .expect("Failed to start Redis container");
    let port = container
        .get_host_port_ipv4(6379)
        .await
        .expect("Failed to get Redis port");

    let config = RedisConfig {
        url: format!("redis://127.0.0.1:{}", port),
        pool_size: 4,
        enabled: true,
    };
    let cache = RedisCacheService::from_config(&config).expect("Failed to build Redis pool");
    let raw = deadpool_redis::Config::from_url(&config.url)
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("Failed to build raw Redis pool");
    (container, cache, raw)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_set_get_delete() {
    let (_container, cache, _raw) = start().await;
    let key = cache_keys::entity_key("role", 1);
    let value = Cached {
        id: 1,
        name: "admin".to_string(),
    };

    cache.set(&key, &value, Duration::from_secs(600)).await.unwrap();
    let back: Option<Cached> = cache.get(&key).await.unwrap();
    assert_eq!(back, Some(value));

    assert!(cache.delete(&key).await.unwrap());
    assert!(!cache.delete(&key).await.unwrap());
    assert!(cache.get::<Cached>(&key).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_entries_expire() {
    let (_container, cache, _raw) = start().await;
    let key = cache_keys::entity_key("role", 2);

    cache.set_raw(&key, "\"x\"", Duration::from_secs(1)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2_100)).await;
    assert!(cache.get_raw(&key).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_malformed_value_is_corruption() {
    let (_container, cache, raw) = start().await;
    let key = cache_keys::entity_key("principal", 3);

    cache.set_raw(&key, "not json", Duration::from_secs(60)).await.unwrap();
    assert!(matches!(
        cache.get::<Cached>(&key).await,
        Err(CustodianError::CacheCorruption { .. })
    ));

    let binary_key = cache_keys::entity_key("principal", 4);
    let mut conn = raw.get().await.unwrap();
    conn.set::<_, _, ()>(&binary_key, vec![0xff_u8, 0xfe, b'{'])
        .await
        .unwrap();
    assert!(matches!(
        cache.get::<Cached>(&binary_key).await,
        Err(CustodianError::CacheCorruption { .. })
    ));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_health_check() {
    let (_container, cache, _raw) = start().await;
    assert_eq!(cache.check().await, HealthStatus::Healthy);
}
