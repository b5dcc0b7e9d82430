use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::branches::dtos::{BranchDto, CreateBranchDto};
use crate::features::branches::services::BranchService;
use crate::shared::types::ApiResponse;

/// List all branches
#[utoipa::path(
    get,
    path = "/api/branches",
    responses(
        (status = 200, description = "List of branches", body = ApiResponse<Vec<BranchDto>>),
    ),
    tag = "branches"
)]
pub async fn list_branches(
    State(service): State<Arc<BranchService>>,
) -> Result<Json<ApiResponse<Vec<BranchDto>>>> {
    let branches = service.list().await?;
    Ok(Json(ApiResponse::success(Some(branches), None, None)))
}

/// Add a branch (admin only)
#[utoipa::path(
    post,
    path = "/api/branches",
    request_body = CreateBranchDto,
    responses(
        (status = 201, description = "Branch created", body = ApiResponse<BranchDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - admin access required"),
        (status = 409, description = "Branch code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "branches"
)]
pub async fn create_branch(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<BranchService>>,
    AppJson(dto): AppJson<CreateBranchDto>,
) -> Result<(StatusCode, Json<ApiResponse<BranchDto>>)> {
    dto.validate()?;

    let branch = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(branch), None, None)),
    ))
}
