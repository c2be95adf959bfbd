//! Repository trait definitions.

use async_trait::async_trait;
use custodian_core::{
    CustodianResult, DeleteOutcome, Principal, PrincipalId, PrincipalPatch, Role, RoleId,
    RolePatch,
};

/// Principal record store.
#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    /// Inserts a new principal. A taken name yields `Conflict`.
    async fn create(&self, name: &str, credential_hash: &str) -> CustodianResult<Principal>;

    /// Finds a live principal by ID.
    async fn find_by_id(&self, id: PrincipalId) -> CustodianResult<Option<Principal>>;

    /// Lists all live principals ordered by id.
    async fn find_all(&self) -> CustodianResult<Vec<Principal>>;

    /// Applies a sparse patch to a live principal.
    ///
    /// Returns `NotFound` when no live row exists.
    async fn update(&self, id: PrincipalId, patch: &PrincipalPatch) -> CustodianResult<Principal>;

    /// Soft deletes a principal.
    ///
    /// Returns `NotFound` only for ids that were never assigned.
    async fn delete(&self, id: PrincipalId) -> CustodianResult<DeleteOutcome>;

    /// Associates a role with a principal. Assigning twice is a no-op.
    async fn assign_role(&self, principal_id: PrincipalId, role_id: RoleId) -> CustodianResult<()>;

    /// Removes a role association. Removing a missing association is a no-op.
    async fn revoke_role(&self, principal_id: PrincipalId, role_id: RoleId) -> CustodianResult<()>;

    /// Lists the live roles assigned to a live principal.
    async fn find_roles(&self, principal_id: PrincipalId) -> CustodianResult<Vec<Role>>;
}

/// Role record store.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Inserts a new role. A taken name yields `Conflict`.
    async fn create(&self, name: &str) -> CustodianResult<Role>;

    /// Finds a live role by ID.
    async fn find_by_id(&self, id: RoleId) -> CustodianResult<Option<Role>>;

    /// Lists all live roles ordered by id.
    async fn find_all(&self) -> CustodianResult<Vec<Role>>;

    /// Applies a sparse patch to a live role.
    async fn update(&self, id: RoleId, patch: &RolePatch) -> CustodianResult<Role>;

    /// Soft deletes a role.
    async fn delete(&self, id: RoleId) -> CustodianResult<DeleteOutcome>;

    /// Lists the live principals holding a live role.
    async fn find_principals(&self, role_id: RoleId) -> CustodianResult<Vec<Principal>>;
}
