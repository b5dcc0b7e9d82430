use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for companies table
#[derive(Debug, Clone, FromRow)]
pub struct Company {
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

pub const COMPANY_COLUMNS: &str = "id, recruiter_id, name, description, website, industry, \
    location, contact_person, contact_email, contact_phone, is_approved, created_at, updated_at";
