//! Principal service trait definition.

use crate::dto::{CreatePrincipalRequest, PrincipalResponse, RoleResponse, UpdatePrincipalRequest};
use async_trait::async_trait;
use custodian_core::{CallContext, CustodianResult, PrincipalId, RoleId};

/// Principal service trait.
///
/// Every call takes the caller's [`CallContext`]; its deadline and
/// cancellation token bound each store and cache round trip.
#[async_trait]
pub trait PrincipalService: Send + Sync {
    /// Creates a new principal. Does not touch the cache.
    async fn create(
        &self,
        ctx: &CallContext,
        request: CreatePrincipalRequest,
    ) -> CustodianResult<PrincipalResponse>;

    /// Lists all live principals straight from the store.
    async fn list(&self, ctx: &CallContext) -> CustodianResult<Vec<PrincipalResponse>>;

    /// Gets a principal by ID through the cache.
    async fn get(&self, ctx: &CallContext, id: PrincipalId) -> CustodianResult<PrincipalResponse>;

    /// Applies a sparse update and invalidates the cached entry.
    async fn update(
        &self,
        ctx: &CallContext,
        id: PrincipalId,
        request: UpdatePrincipalRequest,
    ) -> CustodianResult<PrincipalResponse>;

    /// Soft deletes a principal and invalidates the cached entry.
    async fn delete(&self, ctx: &CallContext, id: PrincipalId) -> CustodianResult<()>;

    /// Assigns a role to a principal.
    async fn assign_role(
        &self,
        ctx: &CallContext,
        id: PrincipalId,
        role_id: RoleId,
    ) -> CustodianResult<()>;

    /// Revokes a role from a principal.
    async fn revoke_role(
        &self,
        ctx: &CallContext,
        id: PrincipalId,
        role_id: RoleId,
    ) -> CustodianResult<()>;

    /// Lists the roles assigned to a principal.
    async fn list_roles(&self, ctx: &CallContext, id: PrincipalId) -> CustodianResult<Vec<RoleResponse>>;
}
