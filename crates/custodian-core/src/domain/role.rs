//! Role entity.

use super::{non_empty, EntityStatus};
use crate::{Entity, RoleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named role that can be assigned to many principals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Role {
    type Id = RoleId;
    const KIND: &'static str = "role";
    const RESOURCE: &'static str = "Role";

    fn id(&self) -> RoleId {
        self.id
    }
}

/// Sparse update for a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePatch {
    pub name: Option<String>,
}

impl RolePatch {
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: non_empty(self.name).map(|n| n.trim().to_string()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().map_or(true, |n| n.trim().is_empty())
    }

    /// Applies the patch to an in-memory role.
    pub fn apply_to(&self, role: &mut Role) {
        if let Some(name) = self.clone().normalized().name {
            role.name = name;
        }
        role.updated_at = Utc::now();
    }
}
