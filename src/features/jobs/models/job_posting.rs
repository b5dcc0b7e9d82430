use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::jobs::eligibility::{self, Requirements};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema, Default)]
#[sqlx(type_name = "job_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    Internship,
    PartTime,
}

/// A job posting joined with its company name and allowed branch codes
#[derive(Debug, Clone, FromRow)]
pub struct JobListing {
    pub id: Uuid,
    pub company_id: Uuid,
    pub company_name: String,
    pub title: String,
    pub description: String,
    pub job_type: JobType,
    pub location: String,
    pub package_min: Decimal,
    pub package_max: Decimal,
    pub minimum_cgpa: Decimal,
    pub maximum_backlogs: i32,
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

/// SELECT list and FROM clause producing `JobListing` rows; callers append WHERE/ORDER
pub const LISTING_SELECT: &str = r#"
    SELECT j.id, j.company_id, c.name AS company_name, j.title, j.description, j.job_type,
           j.location, j.package_min, j.package_max, j.minimum_cgpa, j.maximum_backlogs,
           ARRAY(
               SELECT b.code FROM job_allowed_branches jab
               JOIN branches b ON b.id = jab.branch_id
               WHERE jab.job_id = j.id
               ORDER BY b.code
           )::text[] AS allowed_branches,
           j.allowed_years, j.required_skills, j.deadline, j.vacancies, j.is_active,
           j.bond_details, j.selection_process, j.created_at, j.updated_at
    FROM job_postings j
    JOIN companies c ON c.id = j.company_id
"#;

impl JobListing {
    pub fn requirements(&self) -> Requirements<'_> {
        Requirements {
            minimum_cgpa: self.minimum_cgpa,
            maximum_backlogs: self.maximum_backlogs,
            allowed_branches: &self.allowed_branches,
            allowed_years: &self.allowed_years,
        }
    }

    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        eligibility::is_open(self.is_active, self.deadline, now)
    }
}
