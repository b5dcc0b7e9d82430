use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::applications::models::ApplicationStatus;

/// Request DTO for applying to a job
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ApplyDto {
    #[validate(length(max = 5000, message = "Cover letter must be at most 5000 characters"))]
    pub cover_letter: Option<String>,
}

/// An application as seen by the student who made it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct StudentApplicationDto {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub recruiter_notes: Option<String>,
    pub deadline: DateTime<Utc>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const STUDENT_APPLICATION_SELECT: &str = r#"
    SELECT a.id, a.job_id, j.title AS job_title, c.name AS company_name, a.status,
           a.cover_letter, a.recruiter_notes, j.deadline, a.applied_at, a.updated_at
    FROM job_applications a
    JOIN job_postings j ON j.id = a.job_id
    JOIN companies c ON c.id = j.company_id
"#;

/// An application with applicant details, for recruiters and admins
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct ApplicantDto {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub student_id: Uuid,
    pub student_name: String,
    pub email: String,
    pub enrollment_number: String,
    pub branch_code: String,
    pub year: i16,
    pub cgpa: Decimal,
    pub backlogs: i32,
    pub has_resume: bool,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub recruiter_notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const APPLICANT_SELECT: &str = r#"
    SELECT a.id, a.job_id, j.title AS job_title, c.name AS company_name, a.student_id,
           TRIM(u.first_name || ' ' || u.last_name) AS student_name, u.email,
           sp.enrollment_number, sp.branch_code, sp.year, sp.cgpa, sp.backlogs,
           (sp.resume_key IS NOT NULL) AS has_resume,
           a.status, a.cover_letter, a.recruiter_notes, a.applied_at, a.updated_at
    FROM job_applications a
    JOIN job_postings j ON j.id = a.job_id
    JOIN companies c ON c.id = j.company_id
    JOIN student_profiles sp ON sp.id = a.student_id
    JOIN users u ON u.id = sp.user_id
"#;

/// Query params for application lists
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ApplicationQueryParams {
    /// Only applications in this status
    #[param(value_type = Option<String>)]
    pub status: Option<ApplicationStatus>,
}

/// Request DTO for a recruiter status update
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateApplicationStatusDto {
    pub status: ApplicationStatus,

    #[validate(length(max = 5000, message = "Notes must be at most 5000 characters"))]
    pub recruiter_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_filter_parses_lowercase() {
        let params: ApplicationQueryParams =
            serde_json::from_value(json!({ "status": "shortlisted" })).unwrap();
        assert_eq!(params.status, Some(ApplicationStatus::Shortlisted));
        assert!(serde_json::from_value::<ApplicationQueryParams>(json!({ "status": "hired" })).is_err());
    }

    #[test]
    fn test_apply_body_is_optional() {
        let dto: ApplyDto = serde_json::from_value(json!({})).unwrap();
        assert!(dto.cover_letter.is_none());
    }
}
