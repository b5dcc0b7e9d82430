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
use crate::features::auth::guards::{RequireRecruiter, RequireStudent};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::jobs::dtos::{
    JobDetailDto, JobDto, JobRequestDto, JobSearchParams, RecruiterJobDto, StudentJobDto,
};
use crate::features::jobs::services::JobService;
use crate::shared::types::ApiResponse;

/// Browse open jobs with eligibility (students)
#[utoipa::path(
    get,
    path = "/api/jobs",
    params(JobSearchParams),
    responses(
        (status = 200, description = "Open jobs, eligible first", body = ApiResponse<Vec<StudentJobDto>>),
        (status = 403, description = "Students only"),
        (status = 428, description = "Profile not created yet")
    ),
    security(("bearer_auth" = [])),
    tag = "jobs"
)]
pub async fn browse_jobs(
    RequireStudent(user): RequireStudent,
    State(service): State<Arc<JobService>>,
    AppQuery(params): AppQuery<JobSearchParams>,
) -> Result<Json<ApiResponse<Vec<StudentJobDto>>>> {
    let jobs = service.browse(user.user_id, &params).await?;
    Ok(Json(ApiResponse::success(Some(jobs), None, None)))
}

/// Get job detail
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job detail", body = ApiResponse<JobDetailDto>),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "jobs"
)]
pub async fn get_job(
    user: AuthenticatedUser,
    State(service): State<Arc<JobService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<JobDetailDto>>> {
    let job = service.detail(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(job), None, None)))
}

/// Post a job (recruiter, approved company only)
#[utoipa::path(
    post,
    path = "/api/recruiter/jobs",
    request_body = JobRequestDto,
    responses(
        (status = 201, description = "Job posted", body = ApiResponse<JobDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Company not owned or not approved")
    ),
    security(("bearer_auth" = [])),
    tag = "jobs"
)]
pub async fn create_job(
    RequireRecruiter(user): RequireRecruiter,
    State(service): State<Arc<JobService>>,
    AppJson(dto): AppJson<JobRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<JobDto>>)> {
    let dto = dto.normalized();
    dto.validate()?;

    let job = service.create(user.user_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(job),
            Some("Job posted successfully!".to_string()),
            None,
        )),
    ))
}

/// Edit a job (recruiter)
#[utoipa::path(
    put,
    path = "/api/recruiter/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = JobRequestDto,
    responses(
        (status = 200, description = "Job updated", body = ApiResponse<JobDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Target company not owned or not approved"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer_auth" = [])),
    tag = "jobs"
)]
pub async fn update_job(
    RequireRecruiter(user): RequireRecruiter,
    State(service): State<Arc<JobService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<JobRequestDto>,
) -> Result<Json<ApiResponse<JobDto>>> {
    let dto = dto.normalized();
    dto.validate()?;

    let job = service.update(user.user_id, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(job),
        Some("Job updated successfully!".to_string()),
        None,
    )))
}

/// List the caller's jobs with application counts (recruiter)
#[utoipa::path(
    get,
    path = "/api/recruiter/jobs",
    responses(
        (status = 200, description = "Recruiter's jobs", body = ApiResponse<Vec<RecruiterJobDto>>),
        (status = 403, description = "Recruiters only")
    ),
    security(("bearer_auth" = [])),
    tag = "jobs"
)]
pub async fn list_my_jobs(
    RequireRecruiter(user): RequireRecruiter,
    State(service): State<Arc<JobService>>,
) -> Result<Json<ApiResponse<Vec<RecruiterJobDto>>>> {
    let jobs = service.list_own(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(jobs), None, None)))
}
