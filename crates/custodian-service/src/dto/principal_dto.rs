//! Principal-related DTOs.

use chrono::{DateTime, Utc};
use custodian_core::{EntityStatus, Principal, PrincipalId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a new principal.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePrincipalRequest {
    #[validate(
        length(min = 1, max = 256, message = "Name must be 1-256 characters"),
        custom(function = "custodian_core::rules::not_blank")
    )]
    pub name: String,

    /// Plain secret; only its Argon2 hash is stored.
    #[validate(length(min = 1, max = 256, message = "Secret must be 1-256 characters"))]
    pub secret: String,
}

/// Sparse update for a principal.
///
/// Absent and empty fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePrincipalRequest {
    #[validate(length(max = 256, message = "Name cannot exceed 256 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 256, message = "Secret cannot exceed 256 characters"))]
    pub secret: Option<String>,
}

/// Principal response DTO. Never carries the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PrincipalResponse {
    pub id: PrincipalId,
    pub name: String,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Principal> for PrincipalResponse {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id,
            name: principal.name,
            status: principal.status,
            created_at: principal.created_at,
            updated_at: principal.updated_at,
        }
    }
}
