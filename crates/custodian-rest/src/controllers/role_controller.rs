//! Role management controller.

use super::parse_role_id;
use crate::{
    extractors::{RequestContext, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use custodian_service::{CreateRoleRequest, PrincipalResponse, RoleResponse, UpdateRoleRequest};
use tracing::debug;

/// Creates the role router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", get(get_role).put(update_role).delete(delete_role))
        .route("/:id/principals", get(list_role_principals))
}

/// List all roles.
#[utoipa::path(
    get,
    path = "/roles",
    tag = "roles",
    responses((status = 200, description = "Live roles ordered by id", body = [RoleResponse]))
)]
pub async fn list_roles(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Vec<RoleResponse>> {
    debug!("List roles request");

    let response = state.role_service.list(&ctx).await?;
    ok(response)
}

/// Create a new role.
#[utoipa::path(
    post,
    path = "/roles",
    tag = "roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 409, description = "Name already taken", body = custodian_core::ErrorResponse),
        (status = 422, description = "Invalid request", body = custodian_core::ErrorResponse)
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(request): ValidatedJson<CreateRoleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RoleResponse>>), AppError> {
    debug!("Create role request: {}", request.name);

    let response = state.role_service.create(&ctx, request).await?;
    Ok(created(response))
}

/// Get a role by ID.
#[utoipa::path(
    get,
    path = "/roles/{id}",
    tag = "roles",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role found", body = RoleResponse),
        (status = 404, description = "Role not found", body = custodian_core::ErrorResponse)
    )
)]
pub async fn get_role(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<RoleResponse> {
    debug!("Get role request: {}", id);

    let role_id = parse_role_id(&id)?;
    let response = state.role_service.get(&ctx, role_id).await?;
    ok(response)
}

/// Update a role. Absent or empty fields are left unchanged.
#[utoipa::path(
    put,
    path = "/roles/{id}",
    tag = "roles",
    params(("id" = i64, Path, description = "Role ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleResponse),
        (status = 404, description = "Role not found", body = custodian_core::ErrorResponse),
        (status = 409, description = "Name already taken", body = custodian_core::ErrorResponse)
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateRoleRequest>,
) -> ApiResult<RoleResponse> {
    debug!("Update role request: {}", id);

    let role_id = parse_role_id(&id)?;
    let response = state.role_service.update(&ctx, role_id, request).await?;
    ok(response)
}

/// Soft delete a role.
#[utoipa::path(
    delete,
    path = "/roles/{id}",
    tag = "roles",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 404, description = "Role never existed", body = custodian_core::ErrorResponse)
    )
)]
pub async fn delete_role(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete role request: {}", id);

    let role_id = parse_role_id(&id)?;
    state.role_service.delete(&ctx, role_id).await?;
    Ok(no_content())
}

/// List the principals holding a role.
#[utoipa::path(
    get,
    path = "/roles/{id}/principals",
    tag = "roles",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Principals holding the role", body = [PrincipalResponse]),
        (status = 404, description = "Role not found", body = custodian_core::ErrorResponse)
    )
)]
pub async fn list_role_principals(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Vec<PrincipalResponse>> {
    debug!("List role principals request: {}", id);

    let role_id = parse_role_id(&id)?;
    let response = state.role_service.list_principals(&ctx, role_id).await?;
    ok(response)
}
