//! Cache-aside engine shared by the entity services.

use super::{cache_keys, CacheExt, CacheInterface};
use custodian_core::{CallContext, CustodianError, CustodianResult, Entity};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn, Span};

/// Budget for the `DEL` that follows a committed write.
pub const INVALIDATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Read-through / write-invalidate access to the cache for one entity type.
///
/// Holds no mutable state; concurrent calls only coordinate through the cache
/// and store backends. All log events are parented to the span handed in at
/// construction.
pub struct CacheAside<E> {
    cache: Arc<dyn CacheInterface>,
    ttl: Duration,
    span: Span,
    _entity: PhantomData<fn() -> E>,
}

impl<E> CacheAside<E>
where
    E: Entity + Serialize + DeserializeOwned + Send + Sync,
{
    /// Creates the engine over `cache`, populating entries with `ttl`.
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>, ttl: Duration, span: Span) -> Self {
        Self {
            cache,
            ttl,
            span,
            _entity: PhantomData,
        }
    }

    /// Lifetime given to populated entries.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The span this engine logs under.
    #[must_use]
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Reads an entity, trying the cache before `load`.
    ///
    /// - A hit returns immediately and `load` is never called.
    /// - A malformed cached value is returned as `CacheCorruption`.
    /// - A cache transport failure is logged and treated as a miss.
    /// - `load` returning `None` becomes `NotFound` and nothing is cached.
    /// - A failed populate is logged; the loaded value is still returned.
    pub async fn read<F, Fut>(&self, ctx: &CallContext, id: E::Id, load: F) -> CustodianResult<E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CustodianResult<Option<E>>>,
    {
        let key = cache_keys::entity_key(E::KIND, id);

        match ctx.run("cache lookup", self.cache.get::<E>(&key)).await {
            Ok(Some(cached)) => {
                debug!(parent: &self.span, key = %key, "cache hit");
                return Ok(cached);
            }
            Ok(None) => debug!(parent: &self.span, key = %key, "cache miss"),
            Err(e @ (CustodianError::CacheCorruption { .. }
            | CustodianError::Timeout(_)
            | CustodianError::Cancelled)) => return Err(e),
            Err(e) => {
                warn!(parent: &self.span, key = %key, error = %e, "cache lookup failed; reading from store");
            }
        }

        let entity = ctx
            .run("store read", load())
            .await?
            .ok_or_else(|| CustodianError::not_found(E::RESOURCE, id))?;

        match ctx.run("cache populate", self.cache.set(&key, &entity, self.ttl)).await {
            Ok(()) => debug!(parent: &self.span, key = %key, ttl_secs = self.ttl.as_secs(), "cache populated"),
            Err(e) => warn!(parent: &self.span, key = %key, error = %e, "cache populate failed"),
        }

        Ok(entity)
    }

    /// Drops the cached entry for `id` after a committed store write.
    ///
    /// Never fails: the write has already succeeded, so a cache error is
    /// logged and the entry is left to expire. The `DEL` runs under its own
    /// [`INVALIDATION_TIMEOUT`] rather than the caller's context, so it is
    /// still sent when the caller's deadline passed or it cancelled after
    /// the commit.
    pub async fn invalidate(&self, ctx: &CallContext, id: E::Id) {
        let key = cache_keys::entity_key(E::KIND, id);

        if ctx.is_cancelled() || ctx.remaining().is_some_and(|left| left.is_zero()) {
            debug!(parent: &self.span, key = %key, "caller context expired after commit; invalidating anyway");
        }

        let budget = CallContext::with_timeout(INVALIDATION_TIMEOUT);
        match budget.run("cache invalidate", self.cache.delete(&key)).await {
            Ok(existed) => debug!(parent: &self.span, key = %key, existed, "cache entry invalidated"),
            Err(e) => warn!(parent: &self.span, key = %key, error = %e, "cache invalidation failed"),
        }
    }
}

impl<E> Clone for CacheAside<E> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            ttl: self.ttl,
            span: self.span.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for CacheAside<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAside")
            .field("ttl", &self.ttl)
            .field("cache_enabled", &self.cache.is_enabled())
            .finish_non_exhaustive()
    }
}
