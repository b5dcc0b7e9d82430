use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::companies::dtos::{
    ApprovalAction, CompanyDto, CompanyQueryParams, CompanyRequestDto, CompanySummaryDto,
    RecruiterCompanyDto,
};
use crate::features::companies::models::{Company, COMPANY_COLUMNS};

const DUPLICATE_NAME: &str = "A company with this name already exists";

#[derive(FromRow)]
struct CompanyWithCounts {
    #[sqlx(flatten)]
    company: Company,
    total_jobs: i64,
    active_jobs: i64,
}

/// Service for company registration and approval
pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a company for a recruiter; it starts unapproved
    pub async fn create(&self, recruiter_id: Uuid, dto: CompanyRequestDto) -> Result<CompanyDto> {
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            INSERT INTO companies (
                recruiter_id, name, description, website, industry, location,
                contact_person, contact_email, contact_phone
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(recruiter_id)
        .bind(dto.name.trim())
        .bind(&dto.description)
        .bind(&dto.website)
        .bind(&dto.industry)
        .bind(&dto.location)
        .bind(&dto.contact_person)
        .bind(&dto.contact_email)
        .bind(&dto.contact_phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, DUPLICATE_NAME))?;

        tracing::info!(
            "Company created (awaiting approval): id={}, name={}",
            company.id,
            company.name
        );
        Ok(company.into())
    }

    /// Edit a company owned by the recruiter
    pub async fn update(
        &self,
        recruiter_id: Uuid,
        company_id: Uuid,
        dto: CompanyRequestDto,
    ) -> Result<CompanyDto> {
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies SET
                name = $3, description = $4, website = $5, industry = $6, location = $7,
                contact_person = $8, contact_email = $9, contact_phone = $10,
                updated_at = NOW()
            WHERE id = $1 AND recruiter_id = $2
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(recruiter_id)
        .bind(dto.name.trim())
        .bind(&dto.description)
        .bind(&dto.website)
        .bind(&dto.industry)
        .bind(&dto.location)
        .bind(&dto.contact_person)
        .bind(&dto.contact_email)
        .bind(&dto.contact_phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, DUPLICATE_NAME))?
        .ok_or_else(|| AppError::NotFound(format!("Company '{}' not found", company_id)))?;

        tracing::info!("Company updated: id={}", company.id);
        Ok(company.into())
    }

    /// Companies owned by a recruiter with their job counts
    pub async fn list_own(&self, recruiter_id: Uuid) -> Result<Vec<RecruiterCompanyDto>> {
        let rows = sqlx::query_as::<_, CompanyWithCounts>(
            r#"
            SELECT c.id, c.recruiter_id, c.name, c.description, c.website, c.industry,
                   c.location, c.contact_person, c.contact_email, c.contact_phone,
                   c.is_approved, c.created_at, c.updated_at,
                   (SELECT COUNT(*) FROM job_postings j WHERE j.company_id = c.id) AS total_jobs,
                   (SELECT COUNT(*) FROM job_postings j
                     WHERE j.company_id = c.id AND j.is_active AND j.deadline >= NOW()) AS active_jobs
            FROM companies c
            WHERE c.recruiter_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(recruiter_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list recruiter companies: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows
            .into_iter()
            .map(|r| RecruiterCompanyDto {
                company: r.company.into(),
                total_jobs: r.total_jobs,
                active_jobs: r.active_jobs,
            })
            .collect())
    }

    /// Approved companies, alphabetically
    pub async fn list_approved(&self) -> Result<Vec<CompanySummaryDto>> {
        sqlx::query_as::<_, CompanySummaryDto>(
            "SELECT id, name, industry, location FROM companies WHERE is_approved ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list approved companies: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Admin list with optional approval filter
    pub async fn list_all(&self, params: &CompanyQueryParams) -> Result<(Vec<CompanyDto>, i64)> {
        let approved = params.approval.map(|a| a.is_approved());
        let page = params.pagination();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM companies WHERE ($1::boolean IS NULL OR is_approved = $1)",
        )
        .bind(approved)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count companies: {:?}", e);
            AppError::Database(e)
        })?;

        let companies = sqlx::query_as::<_, Company>(&format!(
            r#"
            SELECT {COMPANY_COLUMNS} FROM companies
            WHERE ($1::boolean IS NULL OR is_approved = $1)
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(approved)
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list companies: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((companies.into_iter().map(Into::into).collect(), total))
    }

    /// Approve or revoke a company
    pub async fn set_approval(&self, company_id: Uuid, action: ApprovalAction) -> Result<CompanyDto> {
        let approve = action == ApprovalAction::Approve;

        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies SET is_approved = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(company_id)
        .bind(approve)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update company approval: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Company '{}' not found", company_id)))?;

        if approve {
            tracing::info!("Company '{}' has been approved", company.name);
        } else {
            tracing::warn!("Company '{}' approval has been revoked", company.name);
        }
        Ok(company.into())
    }

    /// Company owned by the recruiter, or `NotFound`
    pub async fn find_owned(&self, recruiter_id: Uuid, company_id: Uuid) -> Result<Company> {
        sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1 AND recruiter_id = $2"
        ))
        .bind(company_id)
        .bind(recruiter_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get company: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Company '{}' not found", company_id)))
    }
}
