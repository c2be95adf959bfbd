//! Principal entity.

use super::{non_empty, EntityStatus};
use crate::{Entity, PrincipalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticatable principal as stored in the record store.
///
/// This is the value written to the cache, so the credential hash is part of
/// its serialized form. API responses use a separate DTO that omits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Store-assigned identifier.
    pub id: PrincipalId,

    /// Unique human-readable name.
    pub name: String,

    /// Argon2 PHC string of the principal's secret.
    pub credential_hash: String,

    /// Lifecycle status.
    pub status: EntityStatus,

    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,

    /// Soft delete timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Principal {
    /// Checks if the principal is live.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

impl Entity for Principal {
    type Id = PrincipalId;
    const KIND: &'static str = "principal";
    const RESOURCE: &'static str = "Principal";

    fn id(&self) -> PrincipalId {
        self.id
    }
}

/// Sparse update for a principal.
///
/// `None` and empty strings both leave the stored column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrincipalPatch {
    pub name: Option<String>,
    pub credential_hash: Option<String>,
}

impl PrincipalPatch {
    /// Drops empty fields so only meaningful overwrites remain.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: non_empty(self.name).map(|n| n.trim().to_string()),
            credential_hash: non_empty(self.credential_hash),
        }
    }

    /// True when the patch would not change any column.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().map_or(true, |n| n.trim().is_empty())
            && self
                .credential_hash
                .as_deref()
                .map_or(true, |h| h.trim().is_empty())
    }

    /// Applies the patch to an in-memory principal.
    pub fn apply_to(&self, principal: &mut Principal) {
        let patch = self.clone().normalized();
        if let Some(name) = patch.name {
            principal.name = name;
        }
        if let Some(hash) = patch.credential_hash {
            principal.credential_hash = hash;
        }
        principal.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Principal {
        let now = Utc::now();
        Principal {
            id: PrincipalId::new(1),
            name: "alice".to_string(),
            credential_hash: "$argon2id$hash".to_string(),
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_patch_only_overwrites_non_empty_fields() {
        let mut principal = sample();
        let patch = PrincipalPatch {
            name: Some("alice2".to_string()),
            credential_hash: Some(String::new()),
        };
        patch.apply_to(&mut principal);
        assert_eq!(principal.name, "alice2");
        assert_eq!(principal.credential_hash, "$argon2id$hash");
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(PrincipalPatch::default().is_empty());
        assert!(PrincipalPatch {
            name: Some("  ".to_string()),
            credential_hash: None,
        }
        .is_empty());
        assert!(!PrincipalPatch {
            name: None,
            credential_hash: Some("h".to_string()),
        }
        .is_empty());
    }

    #[test]
    fn test_cached_form_keeps_credential() {
        let principal = sample();
        let json = serde_json::to_string(&principal).unwrap();
        let back: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, principal);
    }

    #[test]
    fn test_entity_kind() {
        assert_eq!(Principal::KIND, "principal");
        assert_eq!(sample().id(), PrincipalId::new(1));
    }
}
