//! OpenAPI documentation configuration.

use crate::controllers::health_controller::{ComponentHealth, HealthResponse, ReadinessResponse};
use custodian_core::{EntityStatus, ErrorResponse, FieldError, PrincipalId, RoleId};
use custodian_service::{
    CreatePrincipalRequest, CreateRoleRequest, PrincipalResponse, RoleResponse,
    UpdatePrincipalRequest, UpdateRoleRequest,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Custodian API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Custodian API",
        version = "1.0.0",
        description = "Principal and role management with a read-through cache",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Principal endpoints
        crate::controllers::principal_controller::list_principals,
        crate::controllers::principal_controller::create_principal,
        crate::controllers::principal_controller::get_principal,
        crate::controllers::principal_controller::update_principal,
        crate::controllers::principal_controller::delete_principal,
        crate::controllers::principal_controller::list_principal_roles,
        crate::controllers::principal_controller::assign_role,
        crate::controllers::principal_controller::revoke_role,
        // Role endpoints
        crate::controllers::role_controller::list_roles,
        crate::controllers::role_controller::create_role,
        crate::controllers::role_controller::get_role,
        crate::controllers::role_controller::update_role,
        crate::controllers::role_controller::delete_role,
        crate::controllers::role_controller::list_role_principals,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            PrincipalId,
            RoleId,
            EntityStatus,
            ErrorResponse,
            FieldError,
            CreatePrincipalRequest,
            UpdatePrincipalRequest,
            PrincipalResponse,
            CreateRoleRequest,
            UpdateRoleRequest,
            RoleResponse,
            HealthResponse,
            ComponentHealth,
            ReadinessResponse,
        )
    ),
    tags(
        (name = "principals", description = "Principal management endpoints"),
        (name = "roles", description = "Role management endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_entity_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/principals/{id}"));
        assert!(doc.paths.paths.contains_key("/roles/{id}/principals"));
        assert!(doc.paths.paths.contains_key("/healthz"));
    }
}
