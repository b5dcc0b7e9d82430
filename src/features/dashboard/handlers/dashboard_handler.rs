use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::auth::guards::{RequireRecruiter, RequireStudent};
use crate::features::dashboard::dtos::{
    PlacementSummaryDto, RecruiterDashboardDto, StudentDashboardDto,
};
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

/// Public placement summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "dashboard",
    responses(
        (status = 200, description = "Placement summary", body = ApiResponse<PlacementSummaryDto>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_summary(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<PlacementSummaryDto>>> {
    let summary = service.summary().await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}

/// Student dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard/student",
    tag = "dashboard",
    responses(
        (status = 200, description = "Student dashboard", body = ApiResponse<StudentDashboardDto>),
        (status = 403, description = "Students only"),
        (status = 428, description = "Profile not created yet")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_student_dashboard(
    RequireStudent(user): RequireStudent,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<StudentDashboardDto>>> {
    let dashboard = service.student(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(dashboard), None, None)))
}

/// Recruiter dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard/recruiter",
    tag = "dashboard",
    responses(
        (status = 200, description = "Recruiter dashboard", body = ApiResponse<RecruiterDashboardDto>),
        (status = 403, description = "Recruiters only")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_recruiter_dashboard(
    RequireRecruiter(user): RequireRecruiter,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<RecruiterDashboardDto>>> {
    let dashboard = service.recruiter(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(dashboard), None, None)))
}
