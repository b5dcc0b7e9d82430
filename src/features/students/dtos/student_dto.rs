use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::students::models::{Gender, StudentProfile};
use crate::shared::validation::{
    validate_cgpa, validate_percentage, BRANCH_CODE_REGEX, ENROLLMENT_REGEX,
};

/// Student profile as returned to its owner and to staff
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentProfileDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub enrollment_number: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    pub branch_code: String,
    pub year: i16,
    #[schema(value_type = String, example = "8.45")]
    pub cgpa: Decimal,
    pub backlogs: i32,
    #[schema(value_type = String, example = "91.20")]
    pub tenth_percentage: Decimal,
    #[schema(value_type = String, example = "88.00")]
    pub twelfth_percentage: Decimal,
    pub skills: String,
    pub certifications: Option<String>,
    pub projects: Option<String>,
    pub has_resume: bool,
    pub resume_uploaded_at: Option<DateTime<Utc>>,
    pub is_placed: bool,
    pub placement_company: Option<String>,
    #[schema(value_type = Option<String>)]
    pub placement_package: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StudentProfile> for StudentProfileDto {
    fn from(p: StudentProfile) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            enrollment_number: p.enrollment_number,
            date_of_birth: p.date_of_birth,
            gender: p.gender,
            branch_code: p.branch_code,
            year: p.year,
            cgpa: p.cgpa,
            backlogs: p.backlogs,
            tenth_percentage: p.tenth_percentage,
            twelfth_percentage: p.twelfth_percentage,
            skills: p.skills,
            certifications: p.certifications,
            projects: p.projects,
            has_resume: p.resume_key.is_some(),
            resume_uploaded_at: p.resume_uploaded_at,
            is_placed: p.is_placed,
            placement_company: p.placement_company,
            placement_package: p.placement_package,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Request DTO for creating or editing the caller's own profile
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertStudentProfileDto {
    #[validate(
        length(min = 1, max = 20, message = "Enrollment number must be 1-20 characters"),
        regex(path = *ENROLLMENT_REGEX, message = "Enrollment number may contain uppercase letters, digits, '-' and '/'")
    )]
    pub enrollment_number: String,

    pub date_of_birth: Option<NaiveDate>,

    pub gender: Gender,

    #[validate(regex(path = *BRANCH_CODE_REGEX, message = "Invalid branch code"))]
    pub branch_code: String,

    #[validate(range(min = 1, max = 4, message = "Year must be between 1 and 4"))]
    pub year: i16,

    #[validate(custom(function = "validate_cgpa"))]
    #[schema(value_type = String, example = "8.45")]
    pub cgpa: Decimal,

    #[validate(range(min = 0, message = "Backlogs cannot be negative"))]
    #[serde(default)]
    pub backlogs: i32,

    #[validate(custom(function = "validate_percentage"))]
    #[schema(value_type = String, example = "91.20")]
    pub tenth_percentage: Decimal,

    #[validate(custom(function = "validate_percentage"))]
    #[schema(value_type = String, example = "88.00")]
    pub twelfth_percentage: Decimal,

    #[validate(length(min = 1, message = "Skills are required"))]
    pub skills: String,

    pub certifications: Option<String>,

    pub projects: Option<String>,
}

impl UpsertStudentProfileDto {
    /// Uppercase the identifiers so lookups and uniqueness are case-insensitive
    pub fn normalized(mut self) -> Self {
        self.enrollment_number = self.enrollment_number.trim().to_uppercase();
        self.branch_code = self.branch_code.trim().to_uppercase();
        self
    }
}

/// Resume upload form, for OpenAPI documentation only.
/// The handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadResumeDto {
    /// PDF file, at most 5 MB
    #[schema(format = Binary, content_media_type = "application/pdf")]
    pub resume: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dto() -> UpsertStudentProfileDto {
        UpsertStudentProfileDto {
            enrollment_number: "21CSE042".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2003, 5, 17),
            gender: Gender::Female,
            branch_code: "CSE".to_string(),
            year: 4,
            cgpa: Decimal::from_str("8.45").unwrap(),
            backlogs: 0,
            tenth_percentage: Decimal::from_str("91.2").unwrap(),
            twelfth_percentage: Decimal::from_str("88").unwrap(),
            skills: "Rust, SQL".to_string(),
            certifications: None,
            projects: None,
        }
    }

    #[test]
    fn test_valid_profile() {
        assert!(dto().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_fields_are_reported() {
        let mut invalid = dto();
        invalid.year = 5;
        invalid.cgpa = Decimal::from_str("10.5").unwrap();
        invalid.backlogs = -1;
        invalid.tenth_percentage = Decimal::from_str("101").unwrap();

        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("year"));
        assert!(fields.contains_key("cgpa"));
        assert!(fields.contains_key("backlogs"));
        assert!(fields.contains_key("tenth_percentage"));
    }

    #[test]
    fn test_normalized_uppercases_identifiers() {
        let mut lower = dto();
        lower.enrollment_number = " 21cse042 ".to_string();
        lower.branch_code = "cse".to_string();

        let normalized = lower.normalized();
        assert_eq!(normalized.enrollment_number, "21CSE042");
        assert_eq!(normalized.branch_code, "CSE");
        assert!(normalized.validate().is_ok());
    }
}
