//! Integration tests for PgPrincipalRepository and PgRoleRepository.
//!
//! These tests run against a real PostgreSQL database using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use common::TestDatabase;
use custodian_core::{
    CustodianError, DeleteOutcome, EntityStatus, PrincipalId, PrincipalPatch, RoleId, RolePatch,
};
use custodian_repository::{
    PgPrincipalRepository, PgRoleRepository, PrincipalRepository, RoleRepository,
};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_find_principal() {
    let db = TestDatabase::new().await;
    let repo = PgPrincipalRepository::new(db.pool());

    let created = repo.create("alice", "$argon2id$hash").await.expect("create");
    assert!(created.id.into_inner() > 0);
    assert_eq!(created.status, EntityStatus::Active);
    assert!(created.deleted_at.is_none());

    let found = repo
        .find_by_id(created.id)
        .await
        .expect("query")
        .expect("principal not found");
    assert_eq!(found, created);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_unknown_principal_returns_none() {
    let db = TestDatabase::new().await;
    let repo = PgPrincipalRepository::new(db.pool());

    assert!(repo.find_by_id(PrincipalId::new(999)).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_name_is_conflict() {
    let db = TestDatabase::new().await;
    let repo = PgRoleRepository::new(db.pool());

    repo.create("admin").await.expect("create");
    let err = repo.create("admin").await.unwrap_err();
    assert!(matches!(err, CustodianError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_sparse_update_keeps_unspecified_fields() {
    let db = TestDatabase::new().await;
    let repo = PgPrincipalRepository::new(db.pool());
    let created = repo.create("bob", "hash-1").await.unwrap();

    let updated = repo
        .update(
            created.id,
            &PrincipalPatch {
                name: Some(String::new()),
                credential_hash: Some("hash-2".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "bob");
    assert_eq!(updated.credential_hash, "hash-2");
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_unknown_role_is_not_found() {
    let db = TestDatabase::new().await;
    let repo = PgRoleRepository::new(db.pool());

    let err = repo
        .update(RoleId::new(42), &RolePatch { name: Some("x".to_string()) })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_soft_delete_lifecycle() {
    let db = TestDatabase::new().await;
    let repo = PgRoleRepository::new(db.pool());
    let role = repo.create("auditor").await.unwrap();

    assert_eq!(repo.delete(role.id).await.unwrap(), DeleteOutcome::Deleted);
    assert!(repo.find_by_id(role.id).await.unwrap().is_none());
    assert!(repo.find_all().await.unwrap().is_empty());

    assert_eq!(repo.delete(role.id).await.unwrap(), DeleteOutcome::AlreadyDeleted);
    assert!(repo.delete(RoleId::new(9_999)).await.unwrap_err().is_not_found());

    let err = repo
        .update(role.id, &RolePatch { name: Some("auditor2".to_string()) })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_all_is_ordered_by_id() {
    let db = TestDatabase::new().await;
    let repo = PgPrincipalRepository::new(db.pool());
    let a = repo.create("a", "h").await.unwrap();
    let b = repo.create("b", "h").await.unwrap();

    let all = repo.find_all().await.unwrap();
    assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![a.id, b.id]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_role_assignment() {
    let db = TestDatabase::new().await;
    let principals = PgPrincipalRepository::new(db.pool());
    let roles = PgRoleRepository::new(db.pool());

    let alice = principals.create("alice", "h").await.unwrap();
    let admin = roles.create("admin").await.unwrap();
    let viewer = roles.create("viewer").await.unwrap();

    principals.assign_role(alice.id, admin.id).await.unwrap();
    principals.assign_role(alice.id, admin.id).await.unwrap();
    principals.assign_role(alice.id, viewer.id).await.unwrap();

    let assigned = principals.find_roles(alice.id).await.unwrap();
    assert_eq!(assigned.len(), 2);

    let holders = roles.find_principals(admin.id).await.unwrap();
    assert_eq!(holders.len(), 1);
    assert_eq!(holders[0].id, alice.id);

    roles.delete(viewer.id).await.unwrap();
    assert_eq!(principals.find_roles(alice.id).await.unwrap().len(), 1);

    principals.revoke_role(alice.id, admin.id).await.unwrap();
    assert!(principals.find_roles(alice.id).await.unwrap().is_empty());

    let err = principals
        .assign_role(alice.id, RoleId::new(777))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_health_check() {
    let db = TestDatabase::new().await;
    db.pool().health_check().await.expect("healthy");
}
