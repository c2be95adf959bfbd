//! Principal service implementation.

use crate::cache::{CacheAside, CacheInterface};
use crate::dto::{CreatePrincipalRequest, PrincipalResponse, RoleResponse, UpdatePrincipalRequest};
use crate::principal_service::PrincipalService;
use async_trait::async_trait;
use custodian_core::{
    CallContext, CustodianResult, DeleteOutcome, Principal, PrincipalId, PrincipalPatch, RoleId,
    ValidateExt,
};
use custodian_repository::PrincipalRepository;
use custodian_security::PasswordHasher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, Span};

/// Principal service backed by a record store and the cache-aside engine.
///
/// Secrets are hashed here; the store and the cache only ever see the hash.
pub struct PrincipalServiceImpl {
    repository: Arc<dyn PrincipalRepository>,
    password_hasher: Arc<PasswordHasher>,
    cache: CacheAside<Principal>,
    span: Span,
}

impl PrincipalServiceImpl {
    /// Creates a new principal service logging under `span`.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PrincipalRepository>,
        password_hasher: Arc<PasswordHasher>,
        cache: Arc<dyn CacheInterface>,
        ttl: Duration,
        span: Span,
    ) -> Self {
        Self {
            repository,
            password_hasher,
            cache: CacheAside::new(cache, ttl, span.clone()),
            span,
        }
    }
}

#[async_trait]
impl PrincipalService for PrincipalServiceImpl {
    async fn create(
        &self,
        ctx: &CallContext,
        request: CreatePrincipalRequest,
    ) -> CustodianResult<PrincipalResponse> {
        debug!(parent: &self.span, "Creating principal: {}", request.name);

        request.validate_request()?;
        let credential_hash = self.password_hasher.hash(&request.secret)?;

        let principal = ctx
            .run(
                "principal create",
                self.repository.create(request.name.trim(), &credential_hash),
            )
            .await?;

        info!(parent: &self.span, "Principal created: {}", principal.id);
        Ok(PrincipalResponse::from(principal))
    }

    async fn list(&self, ctx: &CallContext) -> CustodianResult<Vec<PrincipalResponse>> {
        debug!(parent: &self.span, "Listing principals");

        let principals = ctx.run("principal list", self.repository.find_all()).await?;
        Ok(principals.into_iter().map(PrincipalResponse::from).collect())
    }

    async fn get(&self, ctx: &CallContext, id: PrincipalId) -> CustodianResult<PrincipalResponse> {
        debug!(parent: &self.span, "Getting principal: {}", id);

        let principal = self
            .cache
            .read(ctx, id, || self.repository.find_by_id(id))
            .await?;
        Ok(PrincipalResponse::from(principal))
    }

    async fn update(
        &self,
        ctx: &CallContext,
        id: PrincipalId,
        request: UpdatePrincipalRequest,
    ) -> CustodianResult<PrincipalResponse> {
        debug!(parent: &self.span, "Updating principal: {}", id);

        request.validate_request()?;
        let credential_hash = request
            .secret
            .filter(|secret| !secret.is_empty())
            .map(|secret| self.password_hasher.hash(&secret))
            .transpose()?;
        let patch = PrincipalPatch {
            name: request.name,
            credential_hash,
        }
        .normalized();

        let principal = ctx
            .run("principal update", self.repository.update(id, &patch))
            .await?;
        self.cache.invalidate(ctx, id).await;

        info!(parent: &self.span, "Principal updated: {}", id);
        Ok(PrincipalResponse::from(principal))
    }

    async fn delete(&self, ctx: &CallContext, id: PrincipalId) -> CustodianResult<()> {
        debug!(parent: &self.span, "Deleting principal: {}", id);

        let outcome = ctx.run("principal delete", self.repository.delete(id)).await?;
        self.cache.invalidate(ctx, id).await;

        match outcome {
            DeleteOutcome::Deleted => info!(parent: &self.span, "Principal deleted: {}", id),
            DeleteOutcome::AlreadyDeleted => {
                debug!(parent: &self.span, "Principal already deleted: {}", id);
            }
        }
        Ok(())
    }

    async fn assign_role(
        &self,
        ctx: &CallContext,
        id: PrincipalId,
        role_id: RoleId,
    ) -> CustodianResult<()> {
        debug!(parent: &self.span, "Assigning role {} to principal {}", role_id, id);

        ctx.run("principal assign role", self.repository.assign_role(id, role_id))
            .await?;
        self.cache.invalidate(ctx, id).await;

        info!(parent: &self.span, "Role {} assigned to principal {}", role_id, id);
        Ok(())
    }

    async fn revoke_role(
        &self,
        ctx: &CallContext,
        id: PrincipalId,
        role_id: RoleId,
    ) -> CustodianResult<()> {
        debug!(parent: &self.span, "Revoking role {} from principal {}", role_id, id);

        ctx.run("principal revoke role", self.repository.revoke_role(id, role_id))
            .await?;
        self.cache.invalidate(ctx, id).await;

        info!(parent: &self.span, "Role {} revoked from principal {}", role_id, id);
        Ok(())
    }

    async fn list_roles(&self, ctx: &CallContext, id: PrincipalId) -> CustodianResult<Vec<RoleResponse>> {
        debug!(parent: &self.span, "Listing roles of principal: {}", id);

        let roles = ctx.run("principal roles", self.repository.find_roles(id)).await?;
        Ok(roles.into_iter().map(RoleResponse::from).collect())
    }
}
