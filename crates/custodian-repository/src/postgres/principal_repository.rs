//! PostgreSQL principal repository implementation.

use super::rows::{
    qualified, row_exists, soft_delete, PrincipalRow, RoleRow, PRINCIPAL_COLUMNS, ROLE_COLUMNS,
};
use crate::{traits::PrincipalRepository, DatabasePool};
use async_trait::async_trait;
use custodian_core::{
    CustodianError, CustodianResult, DeleteOutcome, Principal, PrincipalId, PrincipalPatch, Role,
    RoleId,
};
use std::sync::Arc;
use tracing::debug;

const TABLE: &str = "principals";

/// PostgreSQL principal repository implementation.
#[derive(Clone)]
pub struct PgPrincipalRepository {
    pool: Arc<DatabasePool>,
}

impl PgPrincipalRepository {
    /// Creates a new PostgreSQL principal repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }

    async fn ensure_live(&self, id: PrincipalId) -> CustodianResult<()> {
        if row_exists(self.pool.inner(), TABLE, id.into_inner(), true).await? {
            Ok(())
        } else {
            Err(CustodianError::not_found("Principal", id))
        }
    }
}

#[async_trait]
impl PrincipalRepository for PgPrincipalRepository {
    async fn create(&self, name: &str, credential_hash: &str) -> CustodianResult<Principal> {
        debug!("Creating principal: {}", name);

        let row = sqlx::query_as::<_, PrincipalRow>(&format!(
            "INSERT INTO principals (name, credential_hash) VALUES ($1, $2) \
             RETURNING {PRINCIPAL_COLUMNS}"
        ))
        .bind(name)
        .bind(credential_hash)
        .fetch_one(self.pool.inner())
        .await?;

        Principal::try_from(row)
    }

    async fn find_by_id(&self, id: PrincipalId) -> CustodianResult<Option<Principal>> {
        debug!("Finding principal by id: {}", id);

        let row = sqlx::query_as::<_, PrincipalRow>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE id = $1 AND status = 'active'"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Principal::try_from).transpose()
    }

    async fn find_all(&self) -> CustodianResult<Vec<Principal>> {
        debug!("Finding all principals");

        let rows = sqlx::query_as::<_, PrincipalRow>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE status = 'active' ORDER BY id"
        ))
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(Principal::try_from).collect()
    }

    async fn update(&self, id: PrincipalId, patch: &PrincipalPatch) -> CustodianResult<Principal> {
        debug!("Updating principal: {}", id);
        let patch = patch.clone().normalized();

        let row = sqlx::query_as::<_, PrincipalRow>(&format!(
            "UPDATE principals SET \
                 name = COALESCE($2, name), \
                 credential_hash = COALESCE($3, credential_hash), \
                 updated_at = NOW() \
             WHERE id = $1 AND status = 'active' \
             RETURNING {PRINCIPAL_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(patch.name)
        .bind(patch.credential_hash)
        .fetch_optional(self.pool.inner())
        .await?;

        match row {
            Some(row) => Principal::try_from(row),
            None => Err(CustodianError::not_found("Principal", id)),
        }
    }

    async fn delete(&self, id: PrincipalId) -> CustodianResult<DeleteOutcome> {
        debug!("Soft deleting principal: {}", id);
        soft_delete(self.pool.inner(), TABLE, "Principal", id.into_inner()).await
    }

    async fn assign_role(&self, principal_id: PrincipalId, role_id: RoleId) -> CustodianResult<()> {
        debug!("Assigning role {} to principal {}", role_id, principal_id);

        self.ensure_live(principal_id).await?;
        if !row_exists(self.pool.inner(), "roles", role_id.into_inner(), true).await? {
            return Err(CustodianError::not_found("Role", role_id));
        }

        sqlx::query(
            "INSERT INTO principal_roles (principal_id, role_id) VALUES ($1, $2) \
             ON CONFLICT (principal_id, role_id) DO NOTHING",
        )
        .bind(principal_id.into_inner())
        .bind(role_id.into_inner())
        .execute(self.pool.inner())
        .await?;

        Ok(())
    }

    async fn revoke_role(&self, principal_id: PrincipalId, role_id: RoleId) -> CustodianResult<()> {
        debug!("Revoking role {} from principal {}", role_id, principal_id);

        self.ensure_live(principal_id).await?;

        sqlx::query("DELETE FROM principal_roles WHERE principal_id = $1 AND role_id = $2")
            .bind(principal_id.into_inner())
            .bind(role_id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(())
    }

    async fn find_roles(&self, principal_id: PrincipalId) -> CustodianResult<Vec<Role>> {
        debug!("Finding roles of principal: {}", principal_id);

        self.ensure_live(principal_id).await?;

        let columns = qualified(ROLE_COLUMNS, "r");
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {columns} FROM roles r \
             JOIN principal_roles pr ON pr.role_id = r.id \
             WHERE pr.principal_id = $1 AND r.status = 'active' \
             ORDER BY r.id"
        ))
        .bind(principal_id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(Role::try_from).collect()
    }
}
