//! Row types shared by the PostgreSQL repositories.

use chrono::{DateTime, Utc};
use custodian_core::{
    CustodianError, CustodianResult, DeleteOutcome, EntityStatus, Principal, PrincipalId, Role,
    RoleId,
};
use sqlx::{FromRow, PgPool};

pub(crate) const PRINCIPAL_COLUMNS: &str =
    "id, name, credential_hash, status, created_at, updated_at, deleted_at";

pub(crate) const ROLE_COLUMNS: &str = "id, name, status, created_at, updated_at, deleted_at";

/// Prefixes every column in `columns` with `alias` for use in joins.
pub(crate) fn qualified(columns: &str, alias: &str) -> String {
    columns
        .split(", ")
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Database row representation of a principal.
#[derive(Debug, FromRow)]
pub(crate) struct PrincipalRow {
    id: i64,
    name: String,
    credential_hash: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<PrincipalRow> for Principal {
    type Error = CustodianError;

    fn try_from(row: PrincipalRow) -> Result<Self, Self::Error> {
        Ok(Principal {
            id: PrincipalId::new(row.id),
            name: row.name,
            credential_hash: row.credential_hash,
            status: parse_status(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

/// Database row representation of a role.
#[derive(Debug, FromRow)]
pub(crate) struct RoleRow {
    id: i64,
    name: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<RoleRow> for Role {
    type Error = CustodianError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Ok(Role {
            id: RoleId::new(row.id),
            name: row.name,
            status: parse_status(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

fn parse_status(s: &str) -> CustodianResult<EntityStatus> {
    s.parse()
        .map_err(|e| CustodianError::Internal(format!("Invalid status in database: {}", e)))
}

/// Checks whether a row exists in `table`, optionally only among live rows.
///
/// `table` is always one of the crate's own table names.
pub(crate) async fn row_exists(
    pool: &PgPool,
    table: &str,
    id: i64,
    live_only: bool,
) -> CustodianResult<bool> {
    let sql = if live_only {
        format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1 AND status = 'active')")
    } else {
        format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)")
    };

    let exists: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(pool).await?;
    Ok(exists)
}

/// Soft deletes a row in `table` and reports what happened.
///
/// A row that was already deleted keeps its original `deleted_at`.
pub(crate) async fn soft_delete(
    pool: &PgPool,
    table: &str,
    resource: &'static str,
    id: i64,
) -> CustodianResult<DeleteOutcome> {
    let sql = format!(
        "UPDATE {table} SET status = 'deleted', deleted_at = NOW(), updated_at = NOW() \
         WHERE id = $1 AND status = 'active'"
    );

    let result = sqlx::query(&sql).bind(id).execute(pool).await?;
    if result.rows_affected() > 0 {
        return Ok(DeleteOutcome::Deleted);
    }

    if row_exists(pool, table, id, false).await? {
        Ok(DeleteOutcome::AlreadyDeleted)
    } else {
        Err(CustodianError::not_found(resource, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal_row(status: &str) -> PrincipalRow {
        let now = Utc::now();
        PrincipalRow {
            id: 5,
            name: "alice".to_string(),
            credential_hash: "$argon2id$x".to_string(),
            status: status.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_principal_row_conversion() {
        let principal = Principal::try_from(principal_row("active")).unwrap();
        assert_eq!(principal.id, PrincipalId::new(5));
        assert_eq!(principal.status, EntityStatus::Active);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = Principal::try_from(principal_row("suspended")).unwrap_err();
        assert!(matches!(err, CustodianError::Internal(_)));
    }

    #[test]
    fn test_qualified_columns() {
        assert_eq!(qualified("id, name", "r"), "r.id, r.name");
    }

    #[test]
    fn test_role_row_conversion() {
        let now = Utc::now();
        let role = Role::try_from(RoleRow {
            id: 2,
            name: "admin".to_string(),
            status: "deleted".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: Some(now),
        })
        .unwrap();
        assert_eq!(role.id, RoleId::new(2));
        assert_eq!(role.status, EntityStatus::Deleted);
        assert_eq!(role.deleted_at, Some(now));
    }
}
