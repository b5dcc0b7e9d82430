use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::jobs::eligibility::Eligibility;
use crate::features::jobs::models::{JobListing, JobType};
use crate::shared::validation::{validate_cgpa, validate_package};

/// Job posting as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobDto {
    pub id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub title: String,
    pub description: String,
    pub job_type: JobType,
    pub location: String,
    /// Lakhs per annum
    pub package_min: Decimal,
    pub package_max: Decimal,
    pub minimum_cgpa: Decimal,
    pub maximum_backlogs: i32,
    /// Branch codes; empty means all branches
    pub allowed_branches: Vec<String>,
    pub allowed_years: Vec<i16>,
    pub required_skills: String,
    pub deadline: DateTime<Utc>,
    pub vacancies: i32,
    pub is_active: bool,
    pub bond_details: Option<String>,
    pub selection_process: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobListing> for JobDto {
    fn from(j: JobListing) -> Self {
        Self {
            id: j.id,
            company_id: j.company_id,
            company_name: j.company_name,
            title: j.title,
            description: j.description,
            job_type: j.job_type,
            location: j.location,
            package_min: j.package_min,
            package_max: j.package_max,
            minimum_cgpa: j.minimum_cgpa,
            maximum_backlogs: j.maximum_backlogs,
            allowed_branches: j.allowed_branches,
            allowed_years: j.allowed_years,
            required_skills: j.required_skills,
            deadline: j.deadline,
            vacancies: j.vacancies,
            is_active: j.is_active,
            bond_details: j.bond_details,
            selection_process: j.selection_process,
            created_at: j.created_at,
            updated_at: j.updated_at,
        }
    }
}

/// A job as seen by a student: eligibility and whether they already applied
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentJobDto {
    #[serde(flatten)]
    pub job: JobDto,
    pub is_eligible: bool,
    pub eligibility_message: String,
    pub year_matches: bool,
    pub has_applied: bool,
}

impl StudentJobDto {
    pub fn new(job: JobDto, eligibility: Eligibility, has_applied: bool) -> Self {
        Self {
            job,
            is_eligible: eligibility.is_eligible,
            eligibility_message: eligibility.eligibility_message,
            year_matches: eligibility.year_matches,
            has_applied,
        }
    }
}

/// Job detail; the eligibility block is only present for students
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobDetailDto {
    #[serde(flatten)]
    pub job: JobDto,
    /// Whether applications are currently accepted
    pub is_open: bool,
    pub is_eligible: Option<bool>,
    pub eligibility_message: Option<String>,
    pub year_matches: Option<bool>,
    pub has_applied: Option<bool>,
}

/// A recruiter's job with application counts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecruiterJobDto {
    #[serde(flatten)]
    pub job: JobDto,
    pub total_applications: i64,
    pub pending_applications: i64,
    pub accepted_applications: i64,
}

/// Query params for browsing open jobs
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct JobSearchParams {
    /// Case-insensitive match on title, company name or description
    pub search: Option<String>,
    /// Restrict to one company
    pub company: Option<Uuid>,
}

fn validate_years(years: &[i16]) -> Result<(), ValidationError> {
    if years.iter().any(|y| !(1..=4).contains(y)) {
        let mut err = ValidationError::new("allowed_years");
        err.message = Some("Allowed years must be between 1 and 4".into());
        return Err(err);
    }
    Ok(())
}

fn validate_package_range(dto: &JobRequestDto) -> Result<(), ValidationError> {
    if dto.package_min > dto.package_max {
        let mut err = ValidationError::new("package_range");
        err.message = Some("Minimum package cannot exceed maximum package".into());
        return Err(err);
    }
    Ok(())
}

fn default_allowed_years() -> Vec<i16> {
    vec![4]
}

fn default_true() -> bool {
    true
}

fn default_vacancies() -> i32 {
    1
}

/// Request DTO for creating or editing a job posting
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_package_range", skip_on_field_errors = false))]
pub struct JobRequestDto {
    pub company_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    pub job_type: JobType,

    #[validate(length(min = 1, max = 200, message = "Location must be 1-200 characters"))]
    pub location: String,

    #[validate(custom(function = "validate_package"))]
    pub package_min: Decimal,

    #[validate(custom(function = "validate_package"))]
    pub package_max: Decimal,

    #[validate(custom(function = "validate_cgpa"))]
    pub minimum_cgpa: Decimal,

    #[validate(range(min = 0, message = "Maximum backlogs cannot be negative"))]
    #[serde(default)]
    pub maximum_backlogs: i32,

    /// Branch ids; empty means every branch is eligible
    #[serde(default)]
    pub allowed_branches: Vec<Uuid>,

    #[validate(custom(function = "validate_years"))]
    #[serde(default = "default_allowed_years")]
    pub allowed_years: Vec<i16>,

    #[validate(length(min = 1, message = "Required skills are required"))]
    pub required_skills: String,

    pub deadline: DateTime<Utc>,

    #[validate(range(min = 1, message = "There must be at least one vacancy"))]
    #[serde(default = "default_vacancies")]
    pub vacancies: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,

    pub bond_details: Option<String>,

    pub selection_process: Option<String>,
}

impl JobRequestDto {
    /// Sorted, de-duplicated years and branch ids
    pub fn normalized(mut self) -> Self {
        self.allowed_years.sort_unstable();
        self.allowed_years.dedup();
        self.allowed_branches.sort_unstable();
        self.allowed_branches.dedup();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> serde_json::Value {
        json!({
            "company_id": Uuid::new_v4(),
            "title": "Graduate Engineer",
            "description": "Build control software",
            "location": "Bengaluru",
            "package_min": "6.00",
            "package_max": "9.50",
            "minimum_cgpa": "7.00",
            "required_skills": "Rust, C",
            "deadline": "2030-01-31T18:00:00Z"
        })
    }

    #[test]
    fn test_defaults_applied() {
        let dto: JobRequestDto = serde_json::from_value(body()).unwrap();
        assert_eq!(dto.job_type, JobType::FullTime);
        assert_eq!(dto.allowed_years, vec![4]);
        assert_eq!(dto.vacancies, 1);
        assert!(dto.is_active);
        assert!(dto.allowed_branches.is_empty());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_inverted_package_range_is_rejected() {
        let mut value = body();
        value["package_min"] = json!("12.00");
        let dto: JobRequestDto = serde_json::from_value(value).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_bad_years_and_vacancies_are_rejected() {
        let mut value = body();
        value["allowed_years"] = json!([3, 5]);
        value["vacancies"] = json!(0);
        let dto: JobRequestDto = serde_json::from_value(value).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("allowed_years"));
        assert!(errors.field_errors().contains_key("vacancies"));
    }

    #[test]
    fn test_normalized_dedups_years() {
        let mut value = body();
        value["allowed_years"] = json!([4, 3, 4]);
        let dto: JobRequestDto = serde_json::from_value(value).unwrap();
        assert_eq!(dto.normalized().allowed_years, vec![3, 4]);
    }

    #[test]
    fn test_job_type_wire_format() {
        assert_eq!(
            serde_json::to_value(JobType::PartTime).unwrap(),
            json!("part_time")
        );
    }
}
