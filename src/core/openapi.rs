use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::applications::{
    dtos as applications_dtos, handlers as applications_handlers,
    models as applications_models,
};
use crate::features::auth;
use crate::features::branches::{dtos as branches_dtos, handlers as branches_handlers};
use crate::features::companies::{dtos as companies_dtos, handlers as companies_handlers};
use crate::features::dashboard::{dtos as dashboard_dtos, handlers as dashboard_handlers};
use crate::features::drives::{dtos as drives_dtos, handlers as drives_handlers};
use crate::features::jobs::{
    dtos as jobs_dtos, eligibility, handlers as jobs_handlers, models as jobs_models,
};
use crate::features::students::{
    dtos as students_dtos, handlers as students_handlers, models as students_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_me,
        // Branches
        branches_handlers::list_branches,
        branches_handlers::create_branch,
        // Students
        students_handlers::get_my_profile,
        students_handlers::upsert_my_profile,
        students_handlers::upload_resume,
        students_handlers::download_my_resume,
        students_handlers::download_student_resume,
        // Companies
        companies_handlers::list_approved_companies,
        companies_handlers::create_company,
        companies_handlers::update_company,
        companies_handlers::list_my_companies,
        companies_handlers::list_all_companies,
        companies_handlers::set_company_approval,
        // Jobs
        jobs_handlers::browse_jobs,
        jobs_handlers::get_job,
        jobs_handlers::create_job,
        jobs_handlers::update_job,
        jobs_handlers::list_my_jobs,
        // Applications
        applications_handlers::apply_to_job,
        applications_handlers::list_my_applications,
        applications_handlers::withdraw_application,
        applications_handlers::list_job_applications,
        applications_handlers::update_application_status,
        // Drives
        drives_handlers::list_active_drives,
        drives_handlers::get_drive,
        drives_handlers::list_all_drives,
        drives_handlers::create_drive,
        drives_handlers::add_drive_company,
        drives_handlers::remove_drive_company,
        drives_handlers::set_drive_active,
        // Dashboards
        dashboard_handlers::get_summary,
        dashboard_handlers::get_student_dashboard,
        dashboard_handlers::get_recruiter_dashboard,
        // Admin
        admin_handlers::get_admin_dashboard,
        admin_handlers::get_statistics,
        admin_handlers::list_students,
        admin_handlers::update_student_placement,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth::UserRole,
            auth::dtos::RegistrationRole,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::AuthUserDto>,
            // Branches
            branches_dtos::BranchDto,
            branches_dtos::CreateBranchDto,
            ApiResponse<Vec<branches_dtos::BranchDto>>,
            ApiResponse<branches_dtos::BranchDto>,
            // Students
            students_models::Gender,
            students_dtos::StudentProfileDto,
            students_dtos::UpsertStudentProfileDto,
            students_dtos::UploadResumeDto,
            ApiResponse<students_dtos::StudentProfileDto>,
            // Companies
            companies_dtos::CompanyDto,
            companies_dtos::RecruiterCompanyDto,
            companies_dtos::CompanySummaryDto,
            companies_dtos::CompanyRequestDto,
            companies_dtos::ApprovalFilter,
            companies_dtos::ApprovalAction,
            companies_dtos::CompanyApprovalDto,
            ApiResponse<companies_dtos::CompanyDto>,
            ApiResponse<Vec<companies_dtos::CompanyDto>>,
            ApiResponse<Vec<companies_dtos::RecruiterCompanyDto>>,
            ApiResponse<Vec<companies_dtos::CompanySummaryDto>>,
            // Jobs
            jobs_models::JobType,
            eligibility::Eligibility,
            jobs_dtos::JobDto,
            jobs_dtos::StudentJobDto,
            jobs_dtos::JobDetailDto,
            jobs_dtos::RecruiterJobDto,
            jobs_dtos::JobRequestDto,
            ApiResponse<jobs_dtos::JobDto>,
            ApiResponse<jobs_dtos::JobDetailDto>,
            ApiResponse<Vec<jobs_dtos::StudentJobDto>>,
            ApiResponse<Vec<jobs_dtos::RecruiterJobDto>>,
            // Applications
            applications_models::ApplicationStatus,
            applications_dtos::ApplyDto,
            applications_dtos::StudentApplicationDto,
            applications_dtos::ApplicantDto,
            applications_dtos::UpdateApplicationStatusDto,
            ApiResponse<applications_dtos::StudentApplicationDto>,
            ApiResponse<Vec<applications_dtos::StudentApplicationDto>>,
            ApiResponse<applications_dtos::ApplicantDto>,
            ApiResponse<Vec<applications_dtos::ApplicantDto>>,
            // Drives
            drives_dtos::DriveDto,
            drives_dtos::DriveDetailDto,
            drives_dtos::CreateDriveDto,
            drives_dtos::DriveCompanyDto,
            drives_dtos::SetDriveActiveDto,
            ApiResponse<drives_dtos::DriveDto>,
            ApiResponse<Vec<drives_dtos::DriveDto>>,
            ApiResponse<drives_dtos::DriveDetailDto>,
            // Dashboards
            dashboard_dtos::PlacementSummaryDto,
            dashboard_dtos::StudentDashboardDto,
            dashboard_dtos::RecruiterDashboardDto,
            ApiResponse<dashboard_dtos::PlacementSummaryDto>,
            ApiResponse<dashboard_dtos::StudentDashboardDto>,
            ApiResponse<dashboard_dtos::RecruiterDashboardDto>,
            // Admin
            admin_dtos::AdminTotalsDto,
            admin_dtos::BranchStatDto,
            admin_dtos::AdminDashboardDto,
            admin_dtos::BranchPlacementStatDto,
            admin_dtos::CompanyPlacementDto,
            admin_dtos::CgpaBucketDto,
            admin_dtos::StatisticsDto,
            admin_dtos::PlacementFilter,
            admin_dtos::AdminStudentDto,
            admin_dtos::UpdatePlacementDto,
            ApiResponse<admin_dtos::AdminDashboardDto>,
            ApiResponse<admin_dtos::StatisticsDto>,
            ApiResponse<Vec<admin_dtos::AdminStudentDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and current account"),
        (name = "branches", description = "Academic branch lookup"),
        (name = "students", description = "Student profiles and resumes"),
        (name = "companies", description = "Recruiter companies and approval"),
        (name = "jobs", description = "Job postings and eligibility"),
        (name = "applications", description = "Job application workflow"),
        (name = "drives", description = "Placement drives"),
        (name = "dashboard", description = "Role dashboards"),
        (name = "admin", description = "Placement office back office"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Campus Placement API",
        version = "0.1.0",
        description = "API documentation for the campus placement service",
    )
)]
pub struct ApiDoc;

/// Registers the bearer JWT security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_workflow_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/jobs/{id}/apply",
            "/api/recruiter/applications/{id}/status",
            "/api/admin/statistics",
            "/api/admin/drives",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
