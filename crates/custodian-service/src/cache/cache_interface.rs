//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use custodian_core::{CustodianError, CustodianResult};
use std::time::Duration;

/// Cache interface for storing and retrieving cached data.
///
/// Uses JSON strings for type-erased storage to maintain dyn-compatibility.
/// A missing key is `Ok(None)`, never an error.
#[async_trait]
pub trait CacheInterface: Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> CustodianResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CustodianResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted. Deleting an absent
    /// key succeeds with `false`.
    async fn delete(&self, key: &str) -> CustodianResult<bool>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Extension trait with typed methods for convenience.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    ///
    /// An empty payload counts as a miss. A payload that does not decode as
    /// `T` is reported as `CacheCorruption` for `key`.
    async fn get<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> CustodianResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) if !json.is_empty() => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| CustodianError::cache_corruption(key, e)),
            _ => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> CustodianResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

// Blanket implementation for all CacheInterface implementations
impl<T: CacheInterface + ?Sized> CacheExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryCache;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        id: i64,
        tags: Vec<String>,
        note: Option<String>,
    }

    #[tokio::test]
    async fn test_set_then_get_returns_equal_value() {
        let cache = InMemoryCache::new();
        let value = Sample {
            id: 7,
            tags: vec!["a".to_string(), "b".to_string()],
            note: None,
        };

        cache.set("k", &value, Duration::from_secs(60)).await.unwrap();
        let back: Option<Sample> = cache.get("k").await.unwrap();
        assert_eq!(back, Some(value));
    }

    #[tokio::test]
    async fn test_absent_key_is_a_miss() {
        let cache = InMemoryCache::new();
        let value: Option<Sample> = cache.get("missing").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_empty_payload_is_a_miss() {
        let cache = InMemoryCache::new();
        cache.seed_raw("k", "");
        let value: Option<Sample> = cache.get("k").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_corruption() {
        let cache = InMemoryCache::new();
        cache.seed_raw("k", "{not json");
        let err = cache.get::<Sample>("k").await.unwrap_err();
        match err {
            CustodianError::CacheCorruption { key, .. } => assert_eq!(key, "k"),
            other => panic!("expected corruption, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wrong_shape_is_corruption() {
        let cache = InMemoryCache::new();
        cache.seed_raw("k", r#"{"id":"seven"}"#);
        assert!(matches!(
            cache.get::<Sample>("k").await,
            Err(CustodianError::CacheCorruption { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_not_an_error() {
        let cache = InMemoryCache::new();
        assert!(!cache.delete("missing").await.unwrap());
    }
}
