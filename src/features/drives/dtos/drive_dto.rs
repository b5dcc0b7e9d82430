use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::companies::dtos::CompanySummaryDto;

/// Placement drive with participation counts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct DriveDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_companies: i64,
    /// Jobs posted by the participating companies
    pub total_jobs: i64,
}

/// Drive detail with its participating companies
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DriveDetailDto {
    #[serde(flatten)]
    pub drive: DriveDto,
    pub companies: Vec<CompanySummaryDto>,
}

fn validate_date_range(dto: &CreateDriveDto) -> Result<(), ValidationError> {
    if dto.start_date > dto.end_date {
        let mut err = ValidationError::new("date_range");
        err.message = Some("Start date cannot be after end date".into());
        return Err(err);
    }
    Ok(())
}

/// Request DTO for creating a placement drive
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_date_range", skip_on_field_errors = false))]
pub struct CreateDriveDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    /// Companies taking part from the start
    #[serde(default)]
    pub company_ids: Vec<Uuid>,
}

/// Request DTO for adding a company to a drive
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DriveCompanyDto {
    pub company_id: Uuid,
}

/// Request DTO for switching a drive on or off
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetDriveActiveDto {
    pub is_active: bool,
}
