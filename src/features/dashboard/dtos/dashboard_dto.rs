use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::applications::dtos::{ApplicantDto, StudentApplicationDto};
use crate::features::companies::dtos::RecruiterCompanyDto;
use crate::features::jobs::dtos::StudentJobDto;
use crate::features::students::dtos::StudentProfileDto;

/// Headline numbers shown on the landing page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct PlacementSummaryDto {
    pub total_students: i64,
    pub approved_companies: i64,
    /// Jobs flagged active, regardless of deadline
    pub active_jobs: i64,
    pub placed_students: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentDashboardDto {
    pub profile: StudentProfileDto,
    pub eligible_jobs_count: i64,
    /// Up to five eligible open jobs, soonest deadline first
    pub eligible_jobs: Vec<StudentJobDto>,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub recent_applications: Vec<StudentApplicationDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecruiterDashboardDto {
    pub companies: Vec<RecruiterCompanyDto>,
    pub total_jobs: i64,
    /// Jobs that are active and whose deadline has not passed
    pub active_jobs: i64,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub recent_applications: Vec<ApplicantDto>,
}
