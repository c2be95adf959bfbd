//! PostgreSQL role repository implementation.

use super::rows::{
    qualified, row_exists, soft_delete, PrincipalRow, RoleRow, PRINCIPAL_COLUMNS, ROLE_COLUMNS,
};
use crate::{traits::RoleRepository, DatabasePool};
use async_trait::async_trait;
use custodian_core::{
    CustodianError, CustodianResult, DeleteOutcome, Principal, Role, RoleId, RolePatch,
};
use std::sync::Arc;
use tracing::debug;

const TABLE: &str = "roles";

/// PostgreSQL role repository implementation.
#[derive(Clone)]
pub struct PgRoleRepository {
    pool: Arc<DatabasePool>,
}

impl PgRoleRepository {
    /// Creates a new PostgreSQL role repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn create(&self, name: &str) -> CustodianResult<Role> {
        debug!("Creating role: {}", name);

        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "INSERT INTO roles (name) VALUES ($1) RETURNING {ROLE_COLUMNS}"
        ))
        .bind(name)
        .fetch_one(self.pool.inner())
        .await?;

        Role::try_from(row)
    }

    async fn find_by_id(&self, id: RoleId) -> CustodianResult<Option<Role>> {
        debug!("Finding role by id: {}", id);

        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1 AND status = 'active'"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Role::try_from).transpose()
    }

    async fn find_all(&self) -> CustodianResult<Vec<Role>> {
        debug!("Finding all roles");

        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE status = 'active' ORDER BY id"
        ))
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(Role::try_from).collect()
    }

    async fn update(&self, id: RoleId, patch: &RolePatch) -> CustodianResult<Role> {
        debug!("Updating role: {}", id);
        let patch = patch.clone().normalized();

        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "UPDATE roles SET name = COALESCE($2, name), updated_at = NOW() \
             WHERE id = $1 AND status = 'active' \
             RETURNING {ROLE_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(patch.name)
        .fetch_optional(self.pool.inner())
        .await?;

        match row {
            Some(row) => Role::try_from(row),
            None => Err(CustodianError::not_found("Role", id)),
        }
    }

    async fn delete(&self, id: RoleId) -> CustodianResult<DeleteOutcome> {
        debug!("Soft deleting role: {}", id);
        soft_delete(self.pool.inner(), TABLE, "Role", id.into_inner()).await
    }

    async fn find_principals(&self, role_id: RoleId) -> CustodianResult<Vec<Principal>> {
        debug!("Finding principals holding role: {}", role_id);

        if !row_exists(self.pool.inner(), TABLE, role_id.into_inner(), true).await? {
            return Err(CustodianError::not_found("Role", role_id));
        }

        let columns = qualified(PRINCIPAL_COLUMNS, "p");
        let rows = sqlx::query_as::<_, PrincipalRow>(&format!(
            "SELECT {columns} FROM principals p \
             JOIN principal_roles pr ON pr.principal_id = p.id \
             WHERE pr.role_id = $1 AND p.status = 'active' \
             ORDER BY p.id"
        ))
        .bind(role_id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(Principal::try_from).collect()
    }
}
