use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::features::applications::dtos::ApplicantDto;
use crate::features::companies::dtos::CompanyDto;
use crate::features::students::dtos::StudentProfileDto;
use crate::features::students::models::StudentProfile;
use crate::shared::types::{default_page, default_page_size, PaginationQuery};
use crate::shared::validation::validate_package;

// =============================================================================
// DASHBOARD
// =============================================================================

/// Platform-wide counters
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct AdminTotalsDto {
    pub total_students: i64,
    pub total_companies: i64,
    pub approved_companies: i64,
    pub total_jobs: i64,
    /// Jobs that are active and whose deadline has not passed
    pub active_jobs: i64,
    pub placed_students: i64,
    pub total_applications: i64,
    pub pending_applications: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct BranchStatDto {
    pub branch_code: String,
    pub total: i64,
    pub placed: i64,
    #[schema(value_type = Option<String>)]
    pub avg_cgpa: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminDashboardDto {
    #[serde(flatten)]
    pub totals: AdminTotalsDto,
    /// Placed students as a percentage of all students, two decimals
    pub placement_percentage: f64,
    pub recent_applications: Vec<ApplicantDto>,
    pub pending_companies: Vec<CompanyDto>,
    pub branch_stats: Vec<BranchStatDto>,
}

// =============================================================================
// STATISTICS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct BranchPlacementStatDto {
    pub branch_code: String,
    pub total_students: i64,
    pub placed_students: i64,
    #[schema(value_type = Option<String>)]
    pub avg_cgpa: Option<Decimal>,
    /// Average package of placed students (LPA)
    #[schema(value_type = Option<String>)]
    pub avg_package: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct CompanyPlacementDto {
    pub placement_company: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CgpaBucketDto {
    pub range: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatisticsDto {
    pub total_students: i64,
    pub placed_students: i64,
    pub placement_percentage: f64,
    pub branch_stats: Vec<BranchPlacementStatDto>,
    pub company_stats: Vec<CompanyPlacementDto>,
    pub cgpa_distribution: Vec<CgpaBucketDto>,
}

// =============================================================================
// STUDENTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlacementFilter {
    Placed,
    NotPlaced,
}

impl PlacementFilter {
    pub fn is_placed(self) -> bool {
        matches!(self, PlacementFilter::Placed)
    }
}

/// Query params for the admin student list
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct StudentQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Branch code, e.g. `CSE`
    pub branch: Option<String>,
    /// Year of study (1-4)
    pub year: Option<i16>,
    /// `placed` or `not_placed`
    #[param(value_type = Option<String>)]
    pub placement: Option<PlacementFilter>,
    /// Search in first name, last name or enrollment number
    pub search: Option<String>,
}

impl StudentQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }
}

/// Student profile row joined with its account
#[derive(Debug, Clone, FromRow)]
pub struct AdminStudentRow {
    #[sqlx(flatten)]
    pub profile: StudentProfile,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminStudentDto {
    #[serde(flatten)]
    pub profile: StudentProfileDto,
    pub student_name: String,
    pub email: String,
}

impl From<AdminStudentRow> for AdminStudentDto {
    fn from(row: AdminStudentRow) -> Self {
        Self {
            student_name: format!("{} {}", row.first_name, row.last_name)
                .trim()
                .to_string(),
            email: row.email,
            profile: row.profile.into(),
        }
    }
}

fn validate_placement(dto: &UpdatePlacementDto) -> Result<(), ValidationError> {
    let has_company = dto
        .placement_company
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());
    if dto.is_placed && !has_company {
        let mut err = ValidationError::new("placement_company");
        err.message = Some("Placement company is required for placed students".into());
        return Err(err);
    }
    Ok(())
}

/// Request DTO for recording a student's placement outcome
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_placement", skip_on_field_errors = false))]
pub struct UpdatePlacementDto {
    pub is_placed: bool,

    #[validate(length(max = 200, message = "Company must be at most 200 characters"))]
    pub placement_company: Option<String>,

    /// Package in LPA
    #[validate(custom(function = "validate_package"))]
    #[schema(value_type = Option<String>, example = "12.50")]
    pub placement_package: Option<Decimal>,
}

impl UpdatePlacementDto {
    /// Unplaced students carry no company or package
    pub fn normalized(self) -> Self {
        if self.is_placed {
            Self {
                placement_company: self.placement_company.map(|c| c.trim().to_string()),
                ..self
            }
        } else {
            Self {
                is_placed: false,
                placement_company: None,
                placement_package: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placed_student_needs_company() {
        let dto: UpdatePlacementDto = serde_json::from_value(json!({
            "is_placed": true,
            "placement_company": "  ",
            "placement_package": "12.50"
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_negative_package_is_rejected() {
        let dto: UpdatePlacementDto = serde_json::from_value(json!({
            "is_placed": true,
            "placement_company": "Acme",
            "placement_package": "-1"
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("placement_package"));
    }

    #[test]
    fn test_unplacing_clears_company_and_package() {
        let dto: UpdatePlacementDto = serde_json::from_value(json!({
            "is_placed": false,
            "placement_company": "Acme",
            "placement_package": "9"
        }))
        .unwrap();
        let dto = dto.normalized();
        assert!(dto.validate().is_ok());
        assert!(dto.placement_company.is_none());
        assert!(dto.placement_package.is_none());
    }

    #[test]
    fn test_student_filters_parse() {
        let params: StudentQueryParams = serde_json::from_value(json!({
            "branch": "CSE",
            "year": 4,
            "placement": "not_placed",
            "page_size": 500
        }))
        .unwrap();
        assert_eq!(params.placement, Some(PlacementFilter::NotPlaced));
        assert!(!params.placement.unwrap().is_placed());
        assert_eq!(params.pagination().limit(), 100);
        assert_eq!(params.pagination().offset(), 0);
    }
}
