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
use crate::features::auth::guards::{RequireAdmin, RequireRecruiter};
use crate::features::companies::dtos::{
    ApprovalAction, CompanyApprovalDto, CompanyDto, CompanyQueryParams, CompanyRequestDto,
    CompanySummaryDto, RecruiterCompanyDto,
};
use crate::features::companies::services::CompanyService;
use crate::shared::types::{ApiResponse, Meta};

/// List approved companies
#[utoipa::path(
    get,
    path = "/api/companies",
    responses(
        (status = 200, description = "Approved companies", body = ApiResponse<Vec<CompanySummaryDto>>),
    ),
    tag = "companies"
)]
pub async fn list_approved_companies(
    State(service): State<Arc<CompanyService>>,
) -> Result<Json<ApiResponse<Vec<CompanySummaryDto>>>> {
    let companies = service.list_approved().await?;
    Ok(Json(ApiResponse::success(Some(companies), None, None)))
}

/// Register a company (recruiter)
#[utoipa::path(
    post,
    path = "/api/companies",
    request_body = CompanyRequestDto,
    responses(
        (status = 201, description = "Company created, awaiting approval", body = ApiResponse<CompanyDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Recruiters only"),
        (status = 409, description = "Company name already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "companies"
)]
pub async fn create_company(
    RequireRecruiter(user): RequireRecruiter,
    State(service): State<Arc<CompanyService>>,
    AppJson(dto): AppJson<CompanyRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<CompanyDto>>)> {
    dto.validate()?;

    let company = service.create(user.user_id, dto).await?;
    let message = format!(
        "Company '{}' created successfully! Awaiting admin approval.",
        company.name
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(company), Some(message), None)),
    ))
}

/// Edit one of the caller's companies
#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    request_body = CompanyRequestDto,
    responses(
        (status = 200, description = "Company updated", body = ApiResponse<CompanyDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Company not found")
    ),
    security(("bearer_auth" = [])),
    tag = "companies"
)]
pub async fn update_company(
    RequireRecruiter(user): RequireRecruiter,
    State(service): State<Arc<CompanyService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CompanyRequestDto>,
) -> Result<Json<ApiResponse<CompanyDto>>> {
    dto.validate()?;

    let company = service.update(user.user_id, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(company),
        Some("Company details updated successfully!".to_string()),
        None,
    )))
}

/// List the caller's companies with job counts
#[utoipa::path(
    get,
    path = "/api/companies/mine",
    responses(
        (status = 200, description = "Recruiter's companies", body = ApiResponse<Vec<RecruiterCompanyDto>>),
        (status = 403, description = "Recruiters only")
    ),
    security(("bearer_auth" = [])),
    tag = "companies"
)]
pub async fn list_my_companies(
    RequireRecruiter(user): RequireRecruiter,
    State(service): State<Arc<CompanyService>>,
) -> Result<Json<ApiResponse<Vec<RecruiterCompanyDto>>>> {
    let companies = service.list_own(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(companies), None, None)))
}

/// List all companies (admin)
#[utoipa::path(
    get,
    path = "/api/admin/companies",
    params(CompanyQueryParams),
    responses(
        (status = 200, description = "Companies", body = ApiResponse<Vec<CompanyDto>>),
        (status = 400, description = "Invalid filter"),
        (status = 403, description = "Forbidden - admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_all_companies(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<CompanyService>>,
    AppQuery(params): AppQuery<CompanyQueryParams>,
) -> Result<Json<ApiResponse<Vec<CompanyDto>>>> {
    let (items, total) = service.list_all(&params).await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Approve or revoke a company (admin)
#[utoipa::path(
    post,
    path = "/api/admin/companies/{id}/approval",
    params(
        ("id" = Uuid, Path, description = "Company ID")
    ),
    request_body = CompanyApprovalDto,
    responses(
        (status = 200, description = "Approval updated", body = ApiResponse<CompanyDto>),
        (status = 403, description = "Forbidden - admin access required"),
        (status = 404, description = "Company not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn set_company_approval(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<CompanyService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CompanyApprovalDto>,
) -> Result<Json<ApiResponse<CompanyDto>>> {
    let company = service.set_approval(id, dto.action).await?;
    let message = match dto.action {
        ApprovalAction::Approve => format!("Company '{}' has been approved.", company.name),
        ApprovalAction::Reject => {
            format!("Company '{}' approval has been revoked.", company.name)
        }
    };
    Ok(Json(ApiResponse::success(Some(company), Some(message), None)))
}
