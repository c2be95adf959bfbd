//! Role-related DTOs.

use chrono::{DateTime, Utc};
use custodian_core::{EntityStatus, Role, RoleId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a new role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRoleRequest {
    #[validate(
        length(min = 1, max = 256, message = "Name must be 1-256 characters"),
        custom(function = "custodian_core::rules::not_blank")
    )]
    pub name: String,
}

/// Sparse update for a role.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    #[validate(length(max = 256, message = "Name cannot exceed 256 characters"))]
    pub name: Option<String>,
}

/// Role response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    pub id: RoleId,
    pub name: String,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            status: role.status,
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}
