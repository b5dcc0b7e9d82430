use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireStaff, RequireStudent};
use crate::features::students::dtos::{StudentProfileDto, UploadResumeDto, UpsertStudentProfileDto};
use crate::features::students::services::{ResumeFile, StudentService};
use crate::shared::constants::RESUME_CONTENT_TYPE;
use crate::shared::types::ApiResponse;

/// Get the calling student's profile
#[utoipa::path(
    get,
    path = "/api/students/me",
    responses(
        (status = 200, description = "Student profile", body = ApiResponse<StudentProfileDto>),
        (status = 403, description = "Students only"),
        (status = 428, description = "Profile not created yet")
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn get_my_profile(
    RequireStudent(user): RequireStudent,
    State(service): State<Arc<StudentService>>,
) -> Result<Json<ApiResponse<StudentProfileDto>>> {
    let profile = service.get_own(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

/// Create or update the calling student's profile
#[utoipa::path(
    put,
    path = "/api/students/me",
    request_body = UpsertStudentProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<StudentProfileDto>),
        (status = 201, description = "Profile created", body = ApiResponse<StudentProfileDto>),
        (status = 400, description = "Validation error or unknown branch"),
        (status = 409, description = "Enrollment number already registered")
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn upsert_my_profile(
    RequireStudent(user): RequireStudent,
    State(service): State<Arc<StudentService>>,
    AppJson(dto): AppJson<UpsertStudentProfileDto>,
) -> Result<(StatusCode, Json<ApiResponse<StudentProfileDto>>)> {
    let dto = dto.normalized();
    dto.validate()?;

    let (profile, created) = service.upsert(user.user_id, dto).await?;
    let (status, message) = if created {
        (StatusCode::CREATED, "Profile created successfully!")
    } else {
        (StatusCode::OK, "Profile updated successfully!")
    };

    Ok((
        status,
        Json(ApiResponse::success(
            Some(profile),
            Some(message.to_string()),
            None,
        )),
    ))
}

/// Upload (or replace) the calling student's resume
///
/// Accepts multipart/form-data with a `resume` field holding a PDF.
#[utoipa::path(
    post,
    path = "/api/students/me/resume",
    request_body(
        content = UploadResumeDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "Resume uploaded", body = ApiResponse<StudentProfileDto>),
        (status = 400, description = "Missing file or not a PDF"),
        (status = 428, description = "Profile not created yet")
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn upload_resume(
    RequireStudent(user): RequireStudent,
    State(service): State<Arc<StudentService>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<StudentProfileDto>>> {
    let mut upload: Option<(Option<String>, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("resume") {
            debug!("Ignoring unknown field: {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        upload = Some((file_name, content_type, data.to_vec()));
    }

    let (file_name, content_type, data) =
        upload.ok_or_else(|| AppError::BadRequest("Resume file is required".to_string()))?;

    let profile = service
        .upload_resume(
            user.user_id,
            file_name.as_deref(),
            content_type.as_deref(),
            data,
        )
        .await?;

    Ok(Json(ApiResponse::success(
        Some(profile),
        Some("Resume uploaded successfully!".to_string()),
        None,
    )))
}

/// Download the calling student's resume
#[utoipa::path(
    get,
    path = "/api/students/me/resume",
    responses(
        (status = 200, description = "Resume PDF", content_type = "application/pdf"),
        (status = 404, description = "No resume uploaded yet"),
        (status = 428, description = "Profile not created yet")
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn download_my_resume(
    RequireStudent(user): RequireStudent,
    State(service): State<Arc<StudentService>>,
) -> Result<Response> {
    let file = service.download_own_resume(user.user_id).await?;
    Ok(attachment(file))
}

/// Download a student's resume (recruiters and admins)
#[utoipa::path(
    get,
    path = "/api/students/{id}/resume",
    params(
        ("id" = Uuid, Path, description = "Student profile ID")
    ),
    responses(
        (status = 200, description = "Resume PDF", content_type = "application/pdf"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Student or resume not found")
    ),
    security(("bearer_auth" = [])),
    tag = "students"
)]
pub async fn download_student_resume(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<StudentService>>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let file = service.download_resume(id).await?;
    Ok(attachment(file))
}

fn attachment(file: ResumeFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, RESUME_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.data,
    )
        .into_response()
}
