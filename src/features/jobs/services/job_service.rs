use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::branches::BranchService;
use crate::features::companies::CompanyService;
use crate::features::jobs::dtos::{
    JobDetailDto, JobDto, JobRequestDto, JobSearchParams, RecruiterJobDto, StudentJobDto,
};
use crate::features::jobs::eligibility::{evaluate, Eligibility};
use crate::features::jobs::models::{JobListing, LISTING_SELECT};
use crate::features::students::models::StudentProfile;
use crate::features::students::StudentService;
use crate::shared::types::search_pattern;

const NO_APPROVED_COMPANY: &str = "You need an approved company before posting jobs.";

#[derive(FromRow)]
struct JobWithCounts {
    #[sqlx(flatten)]
    job: JobListing,
    total_applications: i64,
    pending_applications: i64,
    accepted_applications: i64,
}

/// Eligible jobs first, then by deadline ascending
pub fn rank_for_student(jobs: &mut [StudentJobDto]) {
    jobs.sort_by(|a, b| {
        b.is_eligible
            .cmp(&a.is_eligible)
            .then(a.job.deadline.cmp(&b.job.deadline))
    });
}

/// Service for job postings and student job discovery
pub struct JobService {
    pool: PgPool,
    companies: Arc<CompanyService>,
    branches: Arc<BranchService>,
    students: Arc<StudentService>,
}

impl JobService {
    pub fn new(
        pool: PgPool,
        companies: Arc<CompanyService>,
        branches: Arc<BranchService>,
        students: Arc<StudentService>,
    ) -> Self {
        Self {
            pool,
            companies,
            branches,
            students,
        }
    }

    pub async fn find_listing(&self, job_id: Uuid) -> Result<JobListing> {
        sqlx::query_as::<_, JobListing>(&format!("{LISTING_SELECT} WHERE j.id = $1"))
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get job posting: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Job '{}' not found", job_id)))
    }

    /// Jobs may only be posted against the recruiter's own approved companies
    async fn ensure_postable_company(&self, recruiter_id: Uuid, company_id: Uuid) -> Result<()> {
        match self.companies.find_owned(recruiter_id, company_id).await {
            Ok(company) if company.is_approved => Ok(()),
            Ok(company) => {
                tracing::warn!(
                    "Refused job posting for unapproved company: id={}",
                    company.id
                );
                Err(AppError::Forbidden(NO_APPROVED_COMPANY.to_string()))
            }
            Err(AppError::NotFound(_)) => Err(AppError::Forbidden(NO_APPROVED_COMPANY.to_string())),
            Err(e) => Err(e),
        }
    }

    pub async fn create(&self, recruiter_id: Uuid, dto: JobRequestDto) -> Result<JobDto> {
        self.ensure_postable_company(recruiter_id, dto.company_id).await?;
        self.branches.ensure_exist(&dto.allowed_branches).await?;

        let mut tx = self.begin().await?;

        let job_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO job_postings (
                company_id, title, description, job_type, location, package_min, package_max,
                minimum_cgpa, maximum_backlogs, allowed_years, required_skills, deadline,
                vacancies, is_active, bond_details, selection_process
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
            "#,
        )
        .bind(dto.company_id)
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.job_type)
        .bind(&dto.location)
        .bind(dto.package_min)
        .bind(dto.package_max)
        .bind(dto.minimum_cgpa)
        .bind(dto.maximum_backlogs)
        .bind(&dto.allowed_years)
        .bind(&dto.required_skills)
        .bind(dto.deadline)
        .bind(dto.vacancies)
        .bind(dto.is_active)
        .bind(&dto.bond_details)
        .bind(&dto.selection_process)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, "Job posting already exists"))?;

        Self::replace_allowed_branches(&mut tx, job_id, &dto.allowed_branches).await?;
        self.commit(tx).await?;

        tracing::info!("Job posted: id={}, company={}", job_id, dto.company_id);
        Ok(self.find_listing(job_id).await?.into())
    }

    /// Edit a job belonging to one of the recruiter's companies
    pub async fn update(
        &self,
        recruiter_id: Uuid,
        job_id: Uuid,
        dto: JobRequestDto,
    ) -> Result<JobDto> {
        self.find_owned(recruiter_id, job_id).await?;
        self.ensure_postable_company(recruiter_id, dto.company_id).await?;
        self.branches.ensure_exist(&dto.allowed_branches).await?;

        let mut tx = self.begin().await?;

        sqlx::query(
            r#"
            UPDATE job_postings SET
                company_id = $2, title = $3, description = $4, job_type = $5, location = $6,
                package_min = $7, package_max = $8, minimum_cgpa = $9, maximum_backlogs = $10,
                allowed_years = $11, required_skills = $12, deadline = $13, vacancies = $14,
                is_active = $15, bond_details = $16, selection_process = $17, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .bind(dto.company_id)
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.job_type)
        .bind(&dto.location)
        .bind(dto.package_min)
        .bind(dto.package_max)
        .bind(dto.minimum_cgpa)
        .bind(dto.maximum_backlogs)
        .bind(&dto.allowed_years)
        .bind(&dto.required_skills)
        .bind(dto.deadline)
        .bind(dto.vacancies)
        .bind(dto.is_active)
        .bind(&dto.bond_details)
        .bind(&dto.selection_process)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update job posting: {:?}", e);
            AppError::Database(e)
        })?;

        Self::replace_allowed_branches(&mut tx, job_id, &dto.allowed_branches).await?;
        self.commit(tx).await?;

        tracing::info!("Job updated: id={}", job_id);
        Ok(self.find_listing(job_id).await?.into())
    }

    /// Job of one of the recruiter's companies, or `NotFound`
    pub async fn find_owned(&self, recruiter_id: Uuid, job_id: Uuid) -> Result<JobListing> {
        sqlx::query_as::<_, JobListing>(&format!(
            "{LISTING_SELECT} WHERE j.id = $1 AND c.recruiter_id = $2"
        ))
        .bind(job_id)
        .bind(recruiter_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get recruiter job: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Job '{}' not found", job_id)))
    }

    /// All jobs across the recruiter's companies with application counts
    pub async fn list_own(&self, recruiter_id: Uuid) -> Result<Vec<RecruiterJobDto>> {
        let rows = sqlx::query_as::<_, JobWithCounts>(&format!(
            r#"
            SELECT l.*,
                   (SELECT COUNT(*) FROM job_applications a WHERE a.job_id = l.id) AS total_applications,
                   (SELECT COUNT(*) FROM job_applications a
                     WHERE a.job_id = l.id AND a.status = 'pending') AS pending_applications,
                   (SELECT COUNT(*) FROM job_applications a
                     WHERE a.job_id = l.id AND a.status = 'accepted') AS accepted_applications
            FROM ({LISTING_SELECT} WHERE c.recruiter_id = $1) l
            ORDER BY l.created_at DESC
            "#
        ))
        .bind(recruiter_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list recruiter jobs: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows
            .into_iter()
            .map(|r| RecruiterJobDto {
                job: r.job.into(),
                total_applications: r.total_applications,
                pending_applications: r.pending_applications,
                accepted_applications: r.accepted_applications,
            })
            .collect())
    }

    /// Active jobs before their deadline, optionally filtered
    async fn list_open(&self, params: &JobSearchParams) -> Result<Vec<JobListing>> {
        sqlx::query_as::<_, JobListing>(&format!(
            r#"
            {LISTING_SELECT}
            WHERE j.is_active AND j.deadline >= NOW()
              AND ($1::text IS NULL
                   OR j.title ILIKE $1 OR c.name ILIKE $1 OR j.description ILIKE $1)
              AND ($2::uuid IS NULL OR j.company_id = $2)
            ORDER BY j.deadline ASC
            "#
        ))
        .bind(search_pattern(params.search.as_deref()))
        .bind(params.company)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list open jobs: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn applied_job_ids(&self, student_id: Uuid) -> Result<HashSet<Uuid>> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT job_id FROM job_applications WHERE student_id = $1")
                .bind(student_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to list applied jobs: {:?}", e);
                    AppError::Database(e)
                })?;
        Ok(ids.into_iter().collect())
    }

    /// Open jobs annotated for a student, eligible first
    pub async fn open_jobs_for(
        &self,
        profile: &StudentProfile,
        params: &JobSearchParams,
    ) -> Result<Vec<StudentJobDto>> {
        let listings = self.list_open(params).await?;
        let applied = self.applied_job_ids(profile.id).await?;

        let mut jobs: Vec<StudentJobDto> = listings
            .into_iter()
            .map(|listing| {
                let eligibility = evaluate(&profile.candidate(), &listing.requirements());
                let has_applied = applied.contains(&listing.id);
                StudentJobDto::new(listing.into(), eligibility, has_applied)
            })
            .collect();

        rank_for_student(&mut jobs);
        Ok(jobs)
    }

    /// Browse open jobs as a student; the profile must exist
    pub async fn browse(
        &self,
        user_id: Uuid,
        params: &JobSearchParams,
    ) -> Result<Vec<StudentJobDto>> {
        let profile = self.students.require_profile(user_id).await?;
        self.open_jobs_for(&profile, params).await
    }

    /// Job detail; students also get their eligibility
    pub async fn detail(&self, user: &AuthenticatedUser, job_id: Uuid) -> Result<JobDetailDto> {
        let listing = self.find_listing(job_id).await?;
        let is_open = listing.is_open_at(Utc::now());

        let (eligibility, has_applied) = if user.is_student() {
            match self.students.find_by_user(user.user_id).await? {
                Some(profile) => {
                    let eligibility = evaluate(&profile.candidate(), &listing.requirements());
                    let has_applied = self.applied_job_ids(profile.id).await?.contains(&job_id);
                    (Some(eligibility), Some(has_applied))
                }
                None => (Some(Eligibility::profile_missing()), Some(false)),
            }
        } else {
            (None, None)
        };

        Ok(JobDetailDto {
            job: listing.into(),
            is_open,
            is_eligible: eligibility.as_ref().map(|e| e.is_eligible),
            year_matches: eligibility.as_ref().map(|e| e.year_matches),
            eligibility_message: eligibility.map(|e| e.eligibility_message),
            has_applied,
        })
    }

    async fn replace_allowed_branches(
        tx: &mut Transaction<'_, Postgres>,
        job_id: Uuid,
        branch_ids: &[Uuid],
    ) -> Result<()> {
        sqlx::query("DELETE FROM job_allowed_branches WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to clear allowed branches: {:?}", e);
                AppError::Database(e)
            })?;

        if branch_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO job_allowed_branches (job_id, branch_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(job_id)
        .bind(branch_ids)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::from_db(e, "Branch already allowed"))?;

        Ok(())
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn commit(&self, tx: Transaction<'static, Postgres>) -> Result<()> {
        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit transaction: {:?}", e);
            AppError::Database(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::UserRole;
    use crate::features::jobs::models::JobType;
    use crate::shared::test_helpers::{insert_company, insert_user, MemoryStorage};
    use chrono::{DateTime, Duration};
    use rust_decimal::Decimal;

    fn service(pool: &PgPool) -> JobService {
        JobService::new(
            pool.clone(),
            Arc::new(CompanyService::new(pool.clone())),
            Arc::new(BranchService::new(pool.clone())),
            Arc::new(StudentService::new(
                pool.clone(),
                Arc::new(MemoryStorage::default()),
                "resumes".to_string(),
            )),
        )
    }

    fn request(company_id: Uuid) -> JobRequestDto {
        JobRequestDto {
            company_id,
            title: "Graduate Engineer".to_string(),
            description: "Firmware work".to_string(),
            job_type: JobType::FullTime,
            location: "Pune".to_string(),
            package_min: Decimal::new(600, 2),
            package_max: Decimal::new(900, 2),
            minimum_cgpa: Decimal::new(700, 2),
            maximum_backlogs: 0,
            allowed_branches: vec![],
            allowed_years: vec![4],
            required_skills: "C".to_string(),
            deadline: Utc::now() + Duration::days(14),
            vacancies: 2,
            is_active: true,
            bond_details: None,
            selection_process: None,
        }
    }

    fn job(title: &str, deadline: DateTime<Utc>) -> JobDto {
        JobDto {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            company_name: "Acme".to_string(),
            title: title.to_string(),
            description: String::new(),
            job_type: JobType::FullTime,
            location: "Pune".to_string(),
            package_min: Decimal::new(600, 2),
            package_max: Decimal::new(900, 2),
            minimum_cgpa: Decimal::new(700, 2),
            maximum_backlogs: 0,
            allowed_branches: vec![],
            allowed_years: vec![4],
            required_skills: String::new(),
            deadline,
            vacancies: 1,
            is_active: true,
            bond_details: None,
            selection_process: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn annotated(title: &str, days: i64, eligible: bool) -> StudentJobDto {
        let eligibility = Eligibility {
            is_eligible: eligible,
            eligibility_message: String::new(),
            year_matches: true,
        };
        StudentJobDto::new(job(title, Utc::now() + Duration::days(days)), eligibility, false)
    }

    #[test]
    fn test_rank_puts_eligible_first_then_soonest_deadline() {
        let mut jobs = vec![
            annotated("late-eligible", 10, true),
            annotated("soon-ineligible", 1, false),
            annotated("soon-eligible", 2, true),
            annotated("late-ineligible", 9, false),
        ];

        rank_for_student(&mut jobs);

        let order: Vec<&str> = jobs.iter().map(|j| j.job.title.as_str()).collect();
        assert_eq!(
            order,
            vec!["soon-eligible", "late-eligible", "soon-ineligible", "late-ineligible"]
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_posting_requires_own_approved_company(pool: PgPool) {
        let service = service(&pool);
        let recruiter = insert_user(&pool, UserRole::Recruiter).await;
        let other_recruiter = insert_user(&pool, UserRole::Recruiter).await;

        let unapproved = insert_company(&pool, recruiter, false).await;
        let result = service.create(recruiter, request(unapproved)).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let someone_elses = insert_company(&pool, other_recruiter, true).await;
        let result = service.create(recruiter, request(someone_elses)).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_postings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, 0);

        let approved = insert_company(&pool, recruiter, true).await;
        let job = service.create(recruiter, request(approved)).await.unwrap();
        assert_eq!(job.company_id, approved);
        assert_eq!(job.vacancies, 2);
    }
}
