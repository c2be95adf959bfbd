//! REST API controllers.

pub mod health_controller;
pub mod principal_controller;
pub mod role_controller;

use custodian_core::{CustodianError, PrincipalId, RoleId};

/// Parses a principal ID path segment.
pub(crate) fn parse_principal_id(id: &str) -> Result<PrincipalId, CustodianError> {
    PrincipalId::parse(id)
        .map_err(|_| CustodianError::validation(format!("Invalid principal ID: {}", id)))
}

/// Parses a role ID path segment.
pub(crate) fn parse_role_id(id: &str) -> Result<RoleId, CustodianError> {
    RoleId::parse(id).map_err(|_| CustodianError::validation(format!("Invalid role ID: {}", id)))
}
