//! Application state for Axum handlers.

use custodian_core::HealthCheck;
use custodian_service::{PrincipalService, RoleService};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub principal_service: Arc<dyn PrincipalService>,
    pub role_service: Arc<dyn RoleService>,
    /// Backends probed by the readiness endpoint.
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
    /// Upper bound for a single request's deadline.
    pub request_timeout: Duration,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        principal_service: Arc<dyn PrincipalService>,
        role_service: Arc<dyn RoleService>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            principal_service,
            role_service,
            health_checks: Vec::new(),
            request_timeout,
        }
    }

    /// Registers a backend for readiness checks.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}
