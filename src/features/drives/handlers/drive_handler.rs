use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::drives::dtos::{
    CreateDriveDto, DriveCompanyDto, DriveDetailDto, DriveDto, SetDriveActiveDto,
};
use crate::features::drives::services::DriveService;
use crate::shared::types::ApiResponse;

/// List active placement drives
#[utoipa::path(
    get,
    path = "/api/drives",
    responses(
        (status = 200, description = "Active drives, latest first", body = ApiResponse<Vec<DriveDto>>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "drives"
)]
pub async fn list_active_drives(
    _user: AuthenticatedUser,
    State(service): State<Arc<DriveService>>,
) -> Result<Json<ApiResponse<Vec<DriveDto>>>> {
    let drives = service.list_active().await?;
    let total = drives.len() as i64;
    Ok(Json(ApiResponse::paged(drives, total)))
}

/// Get a drive with its participating companies
#[utoipa::path(
    get,
    path = "/api/drives/{id}",
    params(
        ("id" = Uuid, Path, description = "Drive ID")
    ),
    responses(
        (status = 200, description = "Drive detail", body = ApiResponse<DriveDetailDto>),
        (status = 404, description = "Drive not found")
    ),
    security(("bearer_auth" = [])),
    tag = "drives"
)]
pub async fn get_drive(
    _user: AuthenticatedUser,
    State(service): State<Arc<DriveService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DriveDetailDto>>> {
    let drive = service.detail(id).await?;
    Ok(Json(ApiResponse::success(Some(drive), None, None)))
}

/// List all placement drives (admin)
#[utoipa::path(
    get,
    path = "/api/admin/drives",
    responses(
        (status = 200, description = "All drives, latest start date first", body = ApiResponse<Vec<DriveDto>>),
        (status = 403, description = "Admins only")
    ),
    security(("bearer_auth" = [])),
    tag = "drives"
)]
pub async fn list_all_drives(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DriveService>>,
) -> Result<Json<ApiResponse<Vec<DriveDto>>>> {
    let drives = service.list_all().await?;
    let total = drives.len() as i64;
    Ok(Json(ApiResponse::paged(drives, total)))
}

/// Create a placement drive (admin)
#[utoipa::path(
    post,
    path = "/api/admin/drives",
    request_body = CreateDriveDto,
    responses(
        (status = 201, description = "Drive created", body = ApiResponse<DriveDetailDto>),
        (status = 400, description = "Validation error or unknown company"),
        (status = 403, description = "Admins only")
    ),
    security(("bearer_auth" = [])),
    tag = "drives"
)]
pub async fn create_drive(
    RequireAdmin(user): RequireAdmin,
    State(service): State<Arc<DriveService>>,
    AppJson(dto): AppJson<CreateDriveDto>,
) -> Result<(StatusCode, Json<ApiResponse<DriveDetailDto>>)> {
    dto.validate()?;

    let message = format!("Placement drive '{}' created successfully!", dto.title.trim());
    let drive = service.create(user.user_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(drive), Some(message), None)),
    ))
}

/// Add a company to a drive (admin)
#[utoipa::path(
    post,
    path = "/api/admin/drives/{id}/companies",
    params(
        ("id" = Uuid, Path, description = "Drive ID")
    ),
    request_body = DriveCompanyDto,
    responses(
        (status = 200, description = "Company added", body = ApiResponse<DriveDetailDto>),
        (status = 400, description = "Unknown company"),
        (status = 404, description = "Drive not found")
    ),
    security(("bearer_auth" = [])),
    tag = "drives"
)]
pub async fn add_drive_company(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DriveService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<DriveCompanyDto>,
) -> Result<Json<ApiResponse<DriveDetailDto>>> {
    let drive = service.add_company(id, dto.company_id).await?;
    Ok(Json(ApiResponse::success(Some(drive), None, None)))
}

/// Remove a company from a drive (admin)
#[utoipa::path(
    delete,
    path = "/api/admin/drives/{id}/companies/{company_id}",
    params(
        ("id" = Uuid, Path, description = "Drive ID"),
        ("company_id" = Uuid, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company removed", body = ApiResponse<DriveDetailDto>),
        (status = 404, description = "Drive not found or company not in drive")
    ),
    security(("bearer_auth" = [])),
    tag = "drives"
)]
pub async fn remove_drive_company(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DriveService>>,
    Path((id, company_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<DriveDetailDto>>> {
    let drive = service.remove_company(id, company_id).await?;
    Ok(Json(ApiResponse::success(Some(drive), None, None)))
}

/// Switch a drive on or off (admin)
#[utoipa::path(
    put,
    path = "/api/admin/drives/{id}/active",
    params(
        ("id" = Uuid, Path, description = "Drive ID")
    ),
    request_body = SetDriveActiveDto,
    responses(
        (status = 200, description = "Drive updated", body = ApiResponse<DriveDto>),
        (status = 404, description = "Drive not found")
    ),
    security(("bearer_auth" = [])),
    tag = "drives"
)]
pub async fn set_drive_active(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<DriveService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SetDriveActiveDto>,
) -> Result<Json<ApiResponse<DriveDto>>> {
    let drive = service.set_active(id, dto.is_active).await?;
    Ok(Json(ApiResponse::success(Some(drive), None, None)))
}
