use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::applications::dtos::{
    ApplicantDto, ApplicationQueryParams, ApplyDto, StudentApplicationDto,
    UpdateApplicationStatusDto,
};
use crate::features::applications::services::ApplicationService;
use crate::features::auth::guards::{RequireRecruiter, RequireStudent};
use crate::shared::types::ApiResponse;

/// Apply to a job (students)
#[utoipa::path(
    post,
    path = "/api/jobs/{id}/apply",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = ApplyDto,
    responses(
        (status = 201, description = "Application submitted", body = ApiResponse<StudentApplicationDto>),
        (status = 400, description = "Not eligible or job closed"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Already applied"),
        (status = 428, description = "Profile not created yet")
    ),
    security(("bearer_auth" = [])),
    tag = "applications"
)]
pub async fn apply_to_job(
    RequireStudent(user): RequireStudent,
    State(service): State<Arc<ApplicationService>>,
    Path(job_id): Path<Uuid>,
    AppJson(dto): AppJson<ApplyDto>,
) -> Result<(StatusCode, Json<ApiResponse<StudentApplicationDto>>)> {
    dto.validate()?;

    let application = service.apply(user.user_id, job_id, dto).await?;
    let message = format!(
        "Successfully applied for {} at {}!",
        application.job_title, application.company_name
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(application), Some(message), None)),
    ))
}

/// List the caller's applications, newest first (students)
#[utoipa::path(
    get,
    path = "/api/applications",
    params(ApplicationQueryParams),
    responses(
        (status = 200, description = "Student's applications", body = ApiResponse<Vec<StudentApplicationDto>>),
        (status = 403, description = "Students only"),
        (status = 428, description = "Profile not created yet")
    ),
    security(("bearer_auth" = [])),
    tag = "applications"
)]
pub async fn list_my_applications(
    RequireStudent(user): RequireStudent,
    State(service): State<Arc<ApplicationService>>,
    AppQuery(params): AppQuery<ApplicationQueryParams>,
) -> Result<Json<ApiResponse<Vec<StudentApplicationDto>>>> {
    let applications = service.list_own(user.user_id, params.status).await?;
    let total = applications.len() as i64;
    Ok(Json(ApiResponse::paged(applications, total)))
}

/// Withdraw a pending application before the deadline (students)
#[utoipa::path(
    post,
    path = "/api/applications/{id}/withdraw",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application withdrawn", body = ApiResponse<StudentApplicationDto>),
        (status = 400, description = "Not pending or deadline passed"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "applications"
)]
pub async fn withdraw_application(
    RequireStudent(user): RequireStudent,
    State(service): State<Arc<ApplicationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StudentApplicationDto>>> {
    let application = service.withdraw(user.user_id, id).await?;
    let message = format!(
        "Application for {} has been withdrawn.",
        application.job_title
    );
    Ok(Json(ApiResponse::success(
        Some(application),
        Some(message),
        None,
    )))
}

/// List applications to one of the caller's jobs (recruiters)
#[utoipa::path(
    get,
    path = "/api/recruiter/jobs/{id}/applications",
    params(
        ("id" = Uuid, Path, description = "Job ID"),
        ApplicationQueryParams
    ),
    responses(
        (status = 200, description = "Applicants", body = ApiResponse<Vec<ApplicantDto>>),
        (status = 403, description = "Recruiters only"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "applications"
)]
pub async fn list_job_applications(
    RequireRecruiter(user): RequireRecruiter,
    State(service): State<Arc<ApplicationService>>,
    Path(job_id): Path<Uuid>,
    AppQuery(params): AppQuery<ApplicationQueryParams>,
) -> Result<Json<ApiResponse<Vec<ApplicantDto>>>> {
    let applications = service
        .list_for_job(user.user_id, job_id, params.status)
        .await?;
    let total = applications.len() as i64;
    Ok(Json(ApiResponse::paged(applications, total)))
}

/// Update an application's status and notes (recruiters)
#[utoipa::path(
    put,
    path = "/api/recruiter/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ApplicantDto>),
        (status = 400, description = "Invalid status or withdrawn application"),
        (status = 404, description = "Application not found")
    ),
    security(("bearer_auth" = [])),
    tag = "applications"
)]
pub async fn update_application_status(
    RequireRecruiter(user): RequireRecruiter,
    State(service): State<Arc<ApplicationService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateApplicationStatusDto>,
) -> Result<Json<ApiResponse<ApplicantDto>>> {
    dto.validate()?;

    let application = service.update_status(user.user_id, id, dto).await?;
    let message = format!("Application status updated to {}.", application.status);
    Ok(Json(ApiResponse::success(
        Some(application),
        Some(message),
        None,
    )))
}
