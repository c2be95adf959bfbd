//! In-memory record store and cache fakes.
//!
//! Compiled for this crate's unit tests and, behind the `test-utils`
//! feature, for the test suites of downstream crates.

use crate::cache::CacheInterface;
use async_trait::async_trait;
use chrono::Utc;
use custodian_core::{
    CustodianError, CustodianResult, DeleteOutcome, EntityStatus, Principal, PrincipalId,
    PrincipalPatch, Role, RoleId, RolePatch,
};
use custodian_repository::{PrincipalRepository, RoleRepository};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn sample_role(id: i64, name: &str) -> Role {
    let now = Utc::now();
    Role {
        id: RoleId::new(id),
        name: name.to_string(),
        status: EntityStatus::Active,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

/// Cache fake that records TTLs and can be told to fail.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, Duration)>>,
    fail_gets: AtomicBool,
    fail_sets: AtomicBool,
    fail_deletes: AtomicBool,
    set_calls: AtomicUsize,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed<T: Serialize>(&self, key: &str, value: &T) {
        let json = serde_json::to_string(value).unwrap();
        self.seed_raw(key, &json);
    }

    pub fn seed_raw(&self, key: &str, raw: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (raw.to_string(), Duration::from_secs(600)));
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone())
    }

    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sets(&self, fail: bool) {
        self.fail_sets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    async fn get_raw(&self, key: &str) -> CustodianResult<Option<String>> {
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(CustodianError::Cache("connection refused".to_string()));
        }
        Ok(self.raw(key))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CustodianResult<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(CustodianError::Cache("connection refused".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CustodianResult<bool> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(CustodianError::Cache("connection refused".to_string()));
        }
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

#[derive(Default)]
struct StoreState {
    principals: BTreeMap<i64, Principal>,
    roles: BTreeMap<i64, Role>,
    assignments: BTreeSet<(i64, i64)>,
    next_id: i64,
}

/// Record store fake implementing both repositories over shared state.
///
/// Counts single-entity reads so tests can tell cache hits from store reads.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
    principal_reads: AtomicUsize,
    role_reads: AtomicUsize,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal_reads(&self) -> usize {
        self.principal_reads.load(Ordering::SeqCst)
    }

    pub fn role_reads(&self) -> usize {
        self.role_reads.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn stored_principal(&self, id: PrincipalId) -> Option<Principal> {
        self.state.lock().unwrap().principals.get(&id.into_inner()).cloned()
    }

    fn check_writable(&self) -> CustodianResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CustodianError::Database("connection reset".to_string()));
        }
        Ok(())
    }
}

fn next_id(state: &mut StoreState) -> i64 {
    state.next_id += 1;
    state.next_id
}

#[async_trait]
impl PrincipalRepository for InMemoryStore {
    async fn create(&self, name: &str, credential_hash: &str) -> CustodianResult<Principal> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        if state.principals.values().any(|p| p.name == name) {
            return Err(CustodianError::conflict(format!("principal '{name}' exists")));
        }
        let now = Utc::now();
        let principal = Principal {
            id: PrincipalId::new(next_id(&mut state)),
            name: name.to_string(),
            credential_hash: credential_hash.to_string(),
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.principals.insert(principal.id.into_inner(), principal.clone());
        Ok(principal)
    }

    async fn find_by_id(&self, id: PrincipalId) -> CustodianResult<Option<Principal>> {
        self.principal_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(state
            .principals
            .get(&id.into_inner())
            .filter(|p| p.is_active())
            .cloned())
    }

    async fn find_all(&self) -> CustodianResult<Vec<Principal>> {
        let state = self.state.lock().unwrap();
        Ok(state.principals.values().filter(|p| p.is_active()).cloned().collect())
    }

    async fn update(&self, id: PrincipalId, patch: &PrincipalPatch) -> CustodianResult<Principal> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let principal = state
            .principals
            .get_mut(&id.into_inner())
            .filter(|p| p.is_active())
            .ok_or_else(|| CustodianError::not_found("Principal", id))?;
        patch.apply_to(principal);
        Ok(principal.clone())
    }

    async fn delete(&self, id: PrincipalId) -> CustodianResult<DeleteOutcome> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let principal = state
            .principals
            .get_mut(&id.into_inner())
            .ok_or_else(|| CustodianError::not_found("Principal", id))?;
        if !principal.is_active() {
            return Ok(DeleteOutcome::AlreadyDeleted);
        }
        principal.status = EntityStatus::Deleted;
        principal.deleted_at = Some(Utc::now());
        Ok(DeleteOutcome::Deleted)
    }

    async fn assign_role(&self, principal_id: PrincipalId, role_id: RoleId) -> CustodianResult<()> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        live_principal(&state, principal_id)?;
        live_role(&state, role_id)?;
        state
            .assignments
            .insert((principal_id.into_inner(), role_id.into_inner()));
        Ok(())
    }

    async fn revoke_role(&self, principal_id: PrincipalId, role_id: RoleId) -> CustodianResult<()> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        live_principal(&state, principal_id)?;
        state
            .assignments
            .remove(&(principal_id.into_inner(), role_id.into_inner()));
        Ok(())
    }

    async fn find_roles(&self, principal_id: PrincipalId) -> CustodianResult<Vec<Role>> {
        let state = self.state.lock().unwrap();
        live_principal(&state, principal_id)?;
        Ok(state
            .assignments
            .iter()
            .filter(|(p, _)| *p == principal_id.into_inner())
            .filter_map(|(_, r)| state.roles.get(r))
            .filter(|r| r.status.is_active())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn create(&self, name: &str) -> CustodianResult<Role> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        if state.roles.values().any(|r| r.name == name) {
            return Err(CustodianError::conflict(format!("role '{name}' exists")));
        }
        let id = next_id(&mut state);
        let role = sample_role(id, name);
        state.roles.insert(id, role.clone());
        Ok(role)
    }

    async fn find_by_id(&self, id: RoleId) -> CustodianResult<Option<Role>> {
        self.role_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(state
            .roles
            .get(&id.into_inner())
            .filter(|r| r.status.is_active())
            .cloned())
    }

    async fn find_all(&self) -> CustodianResult<Vec<Role>> {
        let state = self.state.lock().unwrap();
        Ok(state.roles.values().filter(|r| r.status.is_active()).cloned().collect())
    }

    async fn update(&self, id: RoleId, patch: &RolePatch) -> CustodianResult<Role> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let role = state
            .roles
            .get_mut(&id.into_inner())
            .filter(|r| r.status.is_active())
            .ok_or_else(|| CustodianError::not_found("Role", id))?;
        patch.apply_to(role);
        Ok(role.clone())
    }

    async fn delete(&self, id: RoleId) -> CustodianResult<DeleteOutcome> {
        self.check_writable()?;
        let mut state = self.state.lock().unwrap();
        let role = state
            .roles
            .get_mut(&id.into_inner())
            .ok_or_else(|| CustodianError::not_found("Role", id))?;
        if !role.status.is_active() {
            return Ok(DeleteOutcome::AlreadyDeleted);
        }
        role.status = EntityStatus::Deleted;
        role.deleted_at = Some(Utc::now());
        Ok(DeleteOutcome::Deleted)
    }

    async fn find_principals(&self, role_id: RoleId) -> CustodianResult<Vec<Principal>> {
        let state = self.state.lock().unwrap();
        live_role(&state, role_id)?;
        Ok(state
            .assignments
            .iter()
            .filter(|(_, r)| *r == role_id.into_inner())
            .filter_map(|(p, _)| state.principals.get(p))
            .filter(|p| p.is_active())
            .cloned()
            .collect())
    }
}

fn live_principal(state: &StoreState, id: PrincipalId) -> CustodianResult<()> {
    match state.principals.get(&id.into_inner()) {
        Some(p) if p.is_active() => Ok(()),
        _ => Err(CustodianError::not_found("Principal", id)),
    }
}

fn live_role(state: &StoreState, id: RoleId) -> CustodianResult<()> {
    match state.roles.get(&id.into_inner()) {
        Some(r) if r.status.is_active() => Ok(()),
        _ => Err(CustodianError::not_found("Role", id)),
    }
}
