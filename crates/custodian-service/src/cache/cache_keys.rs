//! Cache key generators for consistent key naming.
//!
//! The read path and the invalidation path both build keys here, so a write
//! always removes exactly the entry a read populated.

use custodian_core::{PrincipalId, RoleId};
use std::fmt::Display;

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "custodian:cache";

/// Generate the cache key for an entity of `kind` with `id`.
#[must_use]
pub fn entity_key(kind: &str, id: impl Display) -> String {
    format!("{}:{}:{}", CACHE_PREFIX, kind, id)
}

/// Generate a cache key for a principal by ID.
#[must_use]
pub fn principal(id: PrincipalId) -> String {
    entity_key("principal", id)
}

/// Generate a cache key for a role by ID.
#[must_use]
pub fn role(id: RoleId) -> String {
    entity_key("role", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use custodian_core::{Entity, Principal, Role};

    #[test]
    fn test_principal_key() {
        assert_eq!(principal(PrincipalId::new(42)), "custodian:cache:principal:42");
    }

    #[test]
    fn test_role_key() {
        assert_eq!(role(RoleId::new(7)), "custodian:cache:role:7");
    }

    #[test]
    fn test_entity_key_matches_typed_helpers() {
        assert_eq!(entity_key(Principal::KIND, 3), principal(PrincipalId::new(3)));
        assert_eq!(entity_key(Role::KIND, 3), role(RoleId::new(3)));
    }

    #[test]
    fn test_same_id_different_kinds_do_not_collide() {
        assert_ne!(principal(PrincipalId::new(1)), role(RoleId::new(1)));
    }
}
