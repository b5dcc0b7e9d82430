use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::admin::dtos::*;
use crate::features::admin::services::AdminService;
use crate::features::auth::guards::RequireAdmin;
use crate::features::students::dtos::StudentProfileDto;
use crate::shared::types::ApiResponse;

/// Placement office dashboard
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Admin dashboard", body = ApiResponse<AdminDashboardDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_admin_dashboard(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<AdminDashboardDto>>> {
    let dashboard = service.dashboard().await?;
    Ok(Json(ApiResponse::success(Some(dashboard), None, None)))
}

/// Detailed placement statistics
#[utoipa::path(
    get,
    path = "/api/admin/statistics",
    responses(
        (status = 200, description = "Placement statistics", body = ApiResponse<StatisticsDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_statistics(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<StatisticsDto>>> {
    let statistics = service.statistics().await?;
    Ok(Json(ApiResponse::success(Some(statistics), None, None)))
}

/// List students with filters (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/students",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "Students, best CGPA first", body = ApiResponse<Vec<AdminStudentDto>>),
        (status = 400, description = "Invalid filter"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_students(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    AppQuery(params): AppQuery<StudentQueryParams>,
) -> Result<Json<ApiResponse<Vec<AdminStudentDto>>>> {
    let (students, total) = service.list_students(&params).await?;
    Ok(Json(ApiResponse::paged(students, total)))
}

/// Record a student's placement outcome
#[utoipa::path(
    put,
    path = "/api/admin/students/{id}/placement",
    params(
        ("id" = Uuid, Path, description = "Student profile ID")
    ),
    request_body = UpdatePlacementDto,
    responses(
        (status = 200, description = "Placement updated", body = ApiResponse<StudentProfileDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Student not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_student_placement(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdatePlacementDto>,
) -> Result<Json<ApiResponse<StudentProfileDto>>> {
    let dto = dto.normalized();
    dto.validate()?;

    let profile = service.update_placement(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(profile),
        Some("Placement status updated.".to_string()),
        None,
    )))
}
