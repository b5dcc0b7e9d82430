use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::companies::models::Company;
use crate::shared::types::{default_page, default_page_size, PaginationQuery};
use crate::shared::validation::PHONE_REGEX;

/// Company as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyDto {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub industry: String,
    pub location: String,
    pub contact_person: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Company> for CompanyDto {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            recruiter_id: c.recruiter_id,
            name: c.name,
            description: c.description,
            website: c.website,
            industry: c.industry,
            location: c.location,
            contact_person: c.contact_person,
            contact_email: c.contact_email,
            contact_phone: c.contact_phone,
            is_approved: c.is_approved,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// A recruiter's company with its job counts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecruiterCompanyDto {
    #[serde(flatten)]
    pub company: CompanyDto,
    pub total_jobs: i64,
    /// Jobs that are active and whose deadline has not passed
    pub active_jobs: i64,
}

/// Short company entry used by filters and pickers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct CompanySummaryDto {
    pub id: Uuid,
    pub name: String,
    pub industry: String,
    pub location: String,
}

/// Request DTO for creating or editing a company
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CompanyRequestDto {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(url(message = "Website must be a valid URL"))]
    pub website: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Industry must be 1-100 characters"))]
    pub industry: String,

    #[validate(length(min = 1, max = 200, message = "Location must be 1-200 characters"))]
    pub location: String,

    #[validate(length(min = 1, max = 100, message = "Contact person must be 1-100 characters"))]
    pub contact_person: String,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid contact phone"))]
    pub contact_phone: String,
}

/// Approval filter for the admin company list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalFilter {
    Approved,
    Pending,
}

impl ApprovalFilter {
    pub fn is_approved(self) -> bool {
        matches!(self, ApprovalFilter::Approved)
    }
}

/// Query params for the admin company list
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct CompanyQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// `approved` or `pending`
    #[param(value_type = Option<String>)]
    pub approval: Option<ApprovalFilter>,
}

impl CompanyQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

/// Request DTO for approving or revoking a company
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CompanyApprovalDto {
    pub action: ApprovalAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompanyRequestDto {
        CompanyRequestDto {
            name: "Acme Robotics".to_string(),
            description: "Industrial automation".to_string(),
            website: Some("https://acme.example".to_string()),
            industry: "Manufacturing".to_string(),
            location: "Pune".to_string(),
            contact_person: "Hema R".to_string(),
            contact_email: "hr@acme.example".to_string(),
            contact_phone: "+91 98450 12345".to_string(),
        }
    }

    #[test]
    fn test_valid_company_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_bad_website_and_email() {
        let mut dto = request();
        dto.website = Some("acme dot com".to_string());
        dto.contact_email = "hr-at-acme".to_string();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("website"));
        assert!(errors.field_errors().contains_key("contact_email"));
    }

    #[test]
    fn test_approval_query_parses() {
        let params: CompanyQueryParams =
            serde_json::from_value(serde_json::json!({ "approval": "pending" })).unwrap();
        assert_eq!(params.approval, Some(ApprovalFilter::Pending));
        assert_eq!(params.pagination().limit(), 10);
        assert!(serde_json::from_value::<CompanyApprovalDto>(
            serde_json::json!({ "action": "maybe" })
        )
        .is_err());
    }
}
