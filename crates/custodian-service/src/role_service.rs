//! Role service trait definition.

use crate::dto::{CreateRoleRequest, PrincipalResponse, RoleResponse, UpdateRoleRequest};
use async_trait::async_trait;
use custodian_core::{CallContext, CustodianResult, RoleId};

/// Role service trait.
#[async_trait]
pub trait RoleService: Send + Sync {
    /// Creates a new role. Does not touch the cache.
    async fn create(&self, ctx: &CallContext, request: CreateRoleRequest) -> CustodianResult<RoleResponse>;

    /// Lists all live roles straight from the store.
    async fn list(&self, ctx: &CallContext) -> CustodianResult<Vec<RoleResponse>>;

    /// Gets a role by ID through the cache.
    async fn get(&self, ctx: &CallContext, id: RoleId) -> CustodianResult<RoleResponse>;

    /// Applies a sparse update and invalidates the cached entry.
    async fn update(
        &self,
        ctx: &CallContext,
        id: RoleId,
        request: UpdateRoleRequest,
    ) -> CustodianResult<RoleResponse>;

    /// Soft deletes a role and invalidates the cached entry.
    async fn delete(&self, ctx: &CallContext, id: RoleId) -> CustodianResult<()>;

    /// Lists the principals holding a role.
    async fn list_principals(
        &self,
        ctx: &CallContext,
        id: RoleId,
    ) -> CustodianResult<Vec<PrincipalResponse>>;
}
