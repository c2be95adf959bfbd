//! # Custodian Service
//!
//! Entity services for principals and roles.
//!
//! Every single-entity read goes through [`CacheAside`]: the cache is tried
//! first, the record store is the fallback, and a store hit is written back
//! with a TTL. Updates and deletes commit to the store and then drop the
//! cache entry. Creates and lists never touch the cache.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod principal_service;
pub mod role_service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use cache::*;
pub use dto::*;
pub use principal_service::*;
pub use r#impl::*;
pub use role_service::*;
