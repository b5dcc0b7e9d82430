use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Application status, matching the `application_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Accepted,
    Rejected,
    Withdrawn,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        };
        f.write_str(label)
    }
}

/// Database model for job_applications table
#[derive(Debug, Clone, FromRow)]
pub struct JobApplication {
    pub id: Uuid,
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub recruiter_notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
