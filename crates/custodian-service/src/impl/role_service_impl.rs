//! Role service implementation.

use crate::cache::{CacheAside, CacheInterface};
use crate::dto::{CreateRoleRequest, PrincipalResponse, RoleResponse, UpdateRoleRequest};
use crate::role_service::RoleService;
use async_trait::async_trait;
use custodian_core::{
    CallContext, CustodianResult, DeleteOutcome, Role, RoleId, RolePatch, ValidateExt,
};
use custodian_repository::RoleRepository;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, Span};

/// Role service backed by a record store and the cache-aside engine.
pub struct RoleServiceImpl {
    repository: Arc<dyn RoleRepository>,
    cache: CacheAside<Role>,
    span: Span,
}

impl RoleServiceImpl {
    /// Creates a new role service logging under `span`.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RoleRepository>,
        cache: Arc<dyn CacheInterface>,
        ttl: Duration,
        span: Span,
    ) -> Self {
        Self {
            repository,
            cache: CacheAside::new(cache, ttl, span.clone()),
            span,
        }
    }
}

#[async_trait]
impl RoleService for RoleServiceImpl {
    async fn create(&self, ctx: &CallContext, request: CreateRoleRequest) -> CustodianResult<RoleResponse> {
        debug!(parent: &self.span, "Creating role: {}", request.name);

        request.validate_request()?;
        let name = request.name.trim();

        let role = ctx.run("role create", self.repository.create(name)).await?;

        info!(parent: &self.span, "Role created: {}", role.id);
        Ok(RoleResponse::from(role))
    }

    async fn list(&self, ctx: &CallContext) -> CustodianResult<Vec<RoleResponse>> {
        debug!(parent: &self.span, "Listing roles");

        let roles = ctx.run("role list", self.repository.find_all()).await?;
        Ok(roles.into_iter().map(RoleResponse::from).collect())
    }

    async fn get(&self, ctx: &CallContext, id: RoleId) -> CustodianResult<RoleResponse> {
        debug!(parent: &self.span, "Getting role: {}", id);

        let role = self
            .cache
            .read(ctx, id, || self.repository.find_by_id(id))
            .await?;
        Ok(RoleResponse::from(role))
    }

    async fn update(
        &self,
        ctx: &CallContext,
        id: RoleId,
        request: UpdateRoleRequest,
    ) -> CustodianResult<RoleResponse> {
        debug!(parent: &self.span, "Updating role: {}", id);

        request.validate_request()?;
        let patch = RolePatch { name: request.name }.normalized();

        let role = ctx.run("role update", self.repository.update(id, &patch)).await?;
        self.cache.invalidate(ctx, id).await;

        info!(parent: &self.span, "Role updated: {}", id);
        Ok(RoleResponse::from(role))
    }

    async fn delete(&self, ctx: &CallContext, id: RoleId) -> CustodianResult<()> {
        debug!(parent: &self.span, "Deleting role: {}", id);

        let outcome = ctx.run("role delete", self.repository.delete(id)).await?;
        self.cache.invalidate(ctx, id).await;

        match outcome {
            DeleteOutcome::Deleted => info!(parent: &self.span, "Role deleted: {}", id),
            DeleteOutcome::AlreadyDeleted => debug!(parent: &self.span, "Role already deleted: {}", id),
        }
        Ok(())
    }

    async fn list_principals(
        &self,
        ctx: &CallContext,
        id: RoleId,
    ) -> CustodianResult<Vec<PrincipalResponse>> {
        debug!(parent: &self.span, "Listing principals holding role: {}", id);

        let principals = ctx
            .run("role principals", self.repository.find_principals(id))
            .await?;
        Ok(principals.into_iter().map(PrincipalResponse::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::cache_keys;
    use crate::test_support::{InMemoryCache, InMemoryStore};
    use custodian_core::CustodianError;

    const TTL: Duration = Duration::from_secs(600);

    struct Fixture {
        store: Arc<InMemoryStore>,
        cache: Arc<InMemoryCache>,
        service: RoleServiceImpl,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(InMemoryCache::new());
        let service = RoleServiceImpl::new(store.clone(), cache.clone(), TTL, Span::none());
        Fixture {
            store,
            cache,
            service,
        }
    }

    fn ctx() -> CallContext {
        CallContext::background()
    }

    async fn create(f: &Fixture, name: &str) -> RoleResponse {
        f.service
            .create(&ctx(), CreateRoleRequest { name: name.to_string() })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_admin_to_superadmin_scenario() {
        let f = fixture();
        let created = create(&f, "admin").await;
        let key = cache_keys::role(created.id);
        assert!(f.cache.raw(&key).is_none(), "create must not populate the cache");

        let got = f.service.get(&ctx(), created.id).await.unwrap();
        assert_eq!(got.name, "admin");
        assert!(f.cache.raw(&key).is_some());
        assert_eq!(f.cache.ttl_of(&key), Some(TTL));

        let updated = f
            .service
            .update(
                &ctx(),
                created.id,
                UpdateRoleRequest { name: Some("superadmin".to_string()) },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "superadmin");
        assert!(f.cache.raw(&key).is_none());

        let reads_before = f.store.role_reads();
        let got = f.service.get(&ctx(), created.id).await.unwrap();
        assert_eq!(got.name, "superadmin");
        assert_eq!(f.store.role_reads(), reads_before + 1);
    }

    #[tokio::test]
    async fn test_cold_then_warm_reads() {
        let f = fixture();
        let created = create(&f, "viewer").await;

        f.service.get(&ctx(), created.id).await.unwrap();
        assert_eq!(f.store.role_reads(), 1);

        for _ in 0..3 {
            f.service.get(&ctx(), created.id).await.unwrap();
        }
        assert_eq!(f.store.role_reads(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_role_is_not_found_and_not_cached() {
        let f = fixture();
        let err = f.service.get(&ctx(), RoleId::new(404)).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(f.cache.raw(&cache_keys::role(RoleId::new(404))).is_none());
        assert_eq!(f.cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_cache_entry_is_corruption() {
        let f = fixture();
        let created = create(&f, "admin").await;
        f.cache.seed_raw(&cache_keys::role(created.id), "[1, 2");

        let err = f.service.get(&ctx(), created.id).await.unwrap_err();
        assert!(matches!(err, CustodianError::CacheCorruption { .. }));
        assert_eq!(f.store.role_reads(), 0);
    }

    #[tokio::test]
    async fn test_update_empty_name_keeps_existing() {
        let f = fixture();
        let created = create(&f, "admin").await;

        let updated = f
            .service
            .update(&ctx(), created.id, UpdateRoleRequest { name: Some(String::new()) })
            .await
            .unwrap();
        assert_eq!(updated.name, "admin");
    }

    #[tokio::test]
    async fn test_failed_update_leaves_cache_untouched() {
        let f = fixture();
        let created = create(&f, "admin").await;
        f.service.get(&ctx(), created.id).await.unwrap();
        let key = cache_keys::role(created.id);

        f.store.fail_writes(true);
        let err = f
            .service
            .update(&ctx(), created.id, UpdateRoleRequest { name: Some("x".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(err, CustodianError::Database(_)));
        assert!(f.cache.raw(&key).is_some());
    }

    #[tokio::test]
    async fn test_update_unknown_role_is_not_found() {
        let f = fixture();
        let err = f
            .service
            .update(&ctx(), RoleId::new(5), UpdateRoleRequest { name: Some("x".to_string()) })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_invalidation_failure_does_not_fail_update() {
        let f = fixture();
        let created = create(&f, "admin").await;
        f.service.get(&ctx(), created.id).await.unwrap();
        f.cache.fail_deletes(true);

        let updated = f
            .service
            .update(&ctx(), created.id, UpdateRoleRequest { name: Some("ops".to_string()) })
            .await
            .unwrap();
        assert_eq!(updated.name, "ops");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let f = fixture();
        let created = create(&f, "admin").await;
        f.service.get(&ctx(), created.id).await.unwrap();

        f.service.delete(&ctx(), created.id).await.unwrap();
        assert!(f.cache.raw(&cache_keys::role(created.id)).is_none());
        assert!(f.service.get(&ctx(), created.id).await.unwrap_err().is_not_found());

        f.service.delete(&ctx(), created.id).await.unwrap();
        assert!(f
            .service
            .delete(&ctx(), RoleId::new(12_345))
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_create_and_list_bypass_cache() {
        let f = fixture();
        create(&f, "a").await;
        create(&f, "b").await;

        let roles = f.service.list(&ctx()).await.unwrap();
        assert_eq!(roles.len(), 2);
        assert_eq!(f.cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let f = fixture();
        create(&f, "admin").await;
        let err = f
            .service
            .create(&ctx(), CreateRoleRequest { name: "admin".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, CustodianError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let f = fixture();
        let err = f
            .service
            .create(&ctx(), CreateRoleRequest { name: "  ".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, CustodianError::Validation(_)));
    }
}
