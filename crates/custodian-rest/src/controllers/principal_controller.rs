//! Principal management controller.

use super::{parse_principal_id, parse_role_id};
use crate::{
    extractors::{RequestContext, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use custodian_service::{
    CreatePrincipalRequest, PrincipalResponse, RoleResponse, UpdatePrincipalRequest,
};
use tracing::debug;

/// Creates the principal router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_principals).post(create_principal))
        .route(
            "/:id",
            get(get_principal).put(update_principal).delete(delete_principal),
        )
        .route("/:id/roles", get(list_principal_roles))
        .route("/:id/roles/:role_id", put(assign_role).delete(revoke_role))
}

/// List all principals.
#[utoipa::path(
    get,
    path = "/principals",
    tag = "principals",
    responses((status = 200, description = "Live principals ordered by id", body = [PrincipalResponse]))
)]
pub async fn list_principals(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> ApiResult<Vec<PrincipalResponse>> {
    debug!("List principals request");

    let response = state.principal_service.list(&ctx).await?;
    ok(response)
}

/// Create a new principal.
#[utoipa::path(
    post,
    path = "/principals",
    tag = "principals",
    request_body = CreatePrincipalRequest,
    responses(
        (status = 201, description = "Principal created", body = PrincipalResponse),
        (status = 409, description = "Name already taken", body = custodian_core::ErrorResponse),
        (status = 422, description = "Invalid request", body = custodian_core::ErrorResponse)
    )
)]
pub async fn create_principal(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidatedJson(request): ValidatedJson<CreatePrincipalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PrincipalResponse>>), AppError> {
    debug!("Create principal request: {}", request.name);

    let response = state.principal_service.create(&ctx, request).await?;
    Ok(created(response))
}

/// Get a principal by ID.
#[utoipa::path(
    get,
    path = "/principals/{id}",
    tag = "principals",
    params(("id" = i64, Path, description = "Principal ID")),
    responses(
        (status = 200, description = "Principal found", body = PrincipalResponse),
        (status = 404, description = "Principal not found", body = custodian_core::ErrorResponse)
    )
)]
pub async fn get_principal(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<PrincipalResponse> {
    debug!("Get principal request: {}", id);

    let principal_id = parse_principal_id(&id)?;
    let response = state.principal_service.get(&ctx, principal_id).await?;
    ok(response)
}

/// Update a principal. Absent or empty fields are left unchanged.
#[utoipa::path(
    put,
    path = "/principals/{id}",
    tag = "principals",
    params(("id" = i64, Path, description = "Principal ID")),
    request_body = UpdatePrincipalRequest,
    responses(
        (status = 200, description = "Principal updated", body = PrincipalResponse),
        (status = 404, description = "Principal not found", body = custodian_core::ErrorResponse),
        (status = 409, description = "Name already taken", body = custodian_core::ErrorResponse)
    )
)]
pub async fn update_principal(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePrincipalRequest>,
) -> ApiResult<PrincipalResponse> {
    debug!("Update principal request: {}", id);

    let principal_id = parse_principal_id(&id)?;
    let response = state
        .principal_service
        .update(&ctx, principal_id, request)
        .await?;
    ok(response)
}

/// Soft delete a principal.
#[utoipa::path(
    delete,
    path = "/principals/{id}",
    tag = "principals",
    params(("id" = i64, Path, description = "Principal ID")),
    responses(
        (status = 204, description = "Principal deleted"),
        (status = 404, description = "Principal never existed", body = custodian_core::ErrorResponse)
    )
)]
pub async fn delete_principal(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete principal request: {}", id);

    let principal_id = parse_principal_id(&id)?;
    state.principal_service.delete(&ctx, principal_id).await?;
    Ok(no_content())
}

/// List the roles assigned to a principal.
#[utoipa::path(
    get,
    path = "/principals/{id}/roles",
    tag = "principals",
    params(("id" = i64, Path, description = "Principal ID")),
    responses(
        (status = 200, description = "Assigned roles", body = [RoleResponse]),
        (status = 404, description = "Principal not found", body = custodian_core::ErrorResponse)
    )
)]
pub async fn list_principal_roles(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Vec<RoleResponse>> {
    debug!("List principal roles request: {}", id);

    let principal_id = parse_principal_id(&id)?;
    let response = state.principal_service.list_roles(&ctx, principal_id).await?;
    ok(response)
}

/// Assign a role to a principal.
#[utoipa::path(
    put,
    path = "/principals/{id}/roles/{role_id}",
    tag = "principals",
    params(
        ("id" = i64, Path, description = "Principal ID"),
        ("role_id" = i64, Path, description = "Role ID")
    ),
    responses(
        (status = 204, description = "Role assigned"),
        (status = 404, description = "Principal or role not found", body = custodian_core::ErrorResponse)
    )
)]
pub async fn assign_role(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((id, role_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    debug!("Assign role request: {} -> {}", role_id, id);

    let principal_id = parse_principal_id(&id)?;
    let role_id = parse_role_id(&role_id)?;
    state
        .principal_service
        .assign_role(&ctx, principal_id, role_id)
        .await?;
    Ok(no_content())
}

/// Revoke a role from a principal.
#[utoipa::path(
    delete,
    path = "/principals/{id}/roles/{role_id}",
    tag = "principals",
    params(
        ("id" = i64, Path, description = "Principal ID"),
        ("role_id" = i64, Path, description = "Role ID")
    ),
    responses(
        (status = 204, description = "Role revoked"),
        (status = 404, description = "Principal not found", body = custodian_core::ErrorResponse)
    )
)]
pub async fn revoke_role(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((id, role_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    debug!("Revoke role request: {} -> {}", role_id, id);

    let principal_id = parse_principal_id(&id)?;
    let role_id = parse_role_id(&role_id)?;
    state
        .principal_service
        .revoke_role(&ctx, principal_id, role_id)
        .await?;
    Ok(no_content())
}
