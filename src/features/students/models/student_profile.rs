use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::jobs::eligibility::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Database model for student_profiles table
#[derive(Debug, Clone, FromRow)]
pub struct StudentProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub enrollment_number: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    pub branch_code: String,
    pub year: i16,
    pub cgpa: Decimal,
    pub backlogs: i32,
    pub tenth_percentage: Decimal,
    pub twelfth_percentage: Decimal,
    pub skills: String,
    pub certifications: Option<String>,
    pub projects: Option<String>,
    pub resume_key: Option<String>,
    pub resume_uploaded_at: Option<DateTime<Utc>>,
    pub is_placed: bool,
    pub placement_company: Option<String>,
    pub placement_package: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const PROFILE_COLUMNS: &str = "id, user_id, enrollment_number, date_of_birth, gender, \
    branch_code, year, cgpa, backlogs, tenth_percentage, twelfth_percentage, skills, \
    certifications, projects, resume_key, resume_uploaded_at, is_placed, placement_company, \
    placement_package, created_at, updated_at";

impl StudentProfile {
    pub fn candidate(&self) -> Candidate<'_> {
        Candidate {
            cgpa: self.cgpa,
            backlogs: self.backlogs,
            branch_code: &self.branch_code,
            year: self.year,
        }
    }

    /// File name offered when the resume is downloaded
    pub fn resume_download_name(&self) -> String {
        format!("{}_resume.pdf", self.enrollment_number.replace('/', "-"))
    }
}
