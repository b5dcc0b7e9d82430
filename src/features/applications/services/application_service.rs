use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::applications::dtos::{
    ApplicantDto, ApplyDto, StudentApplicationDto, UpdateApplicationStatusDto, APPLICANT_SELECT,
    STUDENT_APPLICATION_SELECT,
};
use crate::features::applications::models::{ApplicationStatus, JobApplication};
use crate::features::applications::workflow::{
    check_application, check_recruiter_update, check_withdrawal, ALREADY_APPLIED,
};
use crate::features::jobs::eligibility::evaluate;
use crate::features::jobs::JobService;
use crate::features::students::StudentService;

const APPLICATION_COLUMNS: &str =
    "id, student_id, job_id, status, cover_letter, recruiter_notes, applied_at, updated_at";

/// Service for the job application workflow
pub struct ApplicationService {
    pool: PgPool,
    jobs: Arc<JobService>,
    students: Arc<StudentService>,
}

impl ApplicationService {
    pub fn new(pool: PgPool, jobs: Arc<JobService>, students: Arc<StudentService>) -> Self {
        Self {
            pool,
            jobs,
            students,
        }
    }

    /// Apply to a job as the calling student
    pub async fn apply(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        dto: ApplyDto,
    ) -> Result<StudentApplicationDto> {
        let profile = self.students.find_by_user(user_id).await?.ok_or_else(|| {
            AppError::ProfileRequired(
                "Please complete your profile before applying.".to_string(),
            )
        })?;
        let job = self.jobs.find_listing(job_id).await?;

        let already_applied: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM job_applications WHERE student_id = $1 AND job_id = $2)",
        )
        .bind(profile.id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check existing application: {:?}", e);
            AppError::Database(e)
        })?;

        let eligibility = evaluate(&profile.candidate(), &job.requirements());
        let is_open = job.is_open_at(Utc::now());
        if let Err(e) = check_application(already_applied, &eligibility, is_open) {
            tracing::warn!(
                "Refused application: student={}, job={}, reason={}",
                profile.id,
                job_id,
                e
            );
            return Err(e);
        }

        let cover_letter = dto
            .cover_letter
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        // UNIQUE(student_id, job_id) settles concurrent duplicates
        let application = sqlx::query_as::<_, JobApplication>(&format!(
            r#"
            INSERT INTO job_applications (student_id, job_id, status, cover_letter)
            VALUES ($1, $2, $3, $4)
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(profile.id)
        .bind(job_id)
        .bind(ApplicationStatus::Pending)
        .bind(&cover_letter)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, ALREADY_APPLIED))?;

        tracing::info!(
            "Application created: id={}, student={}, job={}",
            application.id,
            profile.id,
            job_id
        );

        Ok(StudentApplicationDto {
            id: application.id,
            job_id,
            job_title: job.title,
            company_name: job.company_name,
            status: application.status,
            cover_letter: application.cover_letter,
            recruiter_notes: application.recruiter_notes,
            deadline: job.deadline,
            applied_at: application.applied_at,
            updated_at: application.updated_at,
        })
    }

    /// The caller's applications, newest first
    pub async fn list_own(
        &self,
        user_id: Uuid,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<StudentApplicationDto>> {
        let profile = self.students.require_profile(user_id).await?;

        sqlx::query_as::<_, StudentApplicationDto>(&format!(
            r#"
            {STUDENT_APPLICATION_SELECT}
            WHERE a.student_id = $1
              AND ($2::application_status IS NULL OR a.status = $2)
            ORDER BY a.applied_at DESC
            "#
        ))
        .bind(profile.id)
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list student applications: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Withdraw one of the caller's pending applications
    pub async fn withdraw(&self, user_id: Uuid, application_id: Uuid) -> Result<StudentApplicationDto> {
        let profile = self.students.require_profile(user_id).await?;

        let current = sqlx::query_as::<_, StudentApplicationDto>(&format!(
            "{STUDENT_APPLICATION_SELECT} WHERE a.id = $1 AND a.student_id = $2"
        ))
        .bind(application_id)
        .bind(profile.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get application: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Application '{}' not found", application_id)))?;

        if let Err(e) = check_withdrawal(current.status, Utc::now() <= current.deadline) {
            tracing::warn!(
                "Refused withdrawal: application={}, status={}",
                application_id,
                current.status
            );
            return Err(e);
        }

        // status guard keeps a concurrent recruiter update from being overwritten
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE job_applications SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = $3
            RETURNING id
            "#,
        )
        .bind(application_id)
        .bind(ApplicationStatus::Withdrawn)
        .bind(ApplicationStatus::Pending)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to withdraw application: {:?}", e);
            AppError::Database(e)
        })?;

        if updated.is_none() {
            return Err(AppError::Conflict(
                "The application status changed; please reload.".to_string(),
            ));
        }

        tracing::info!("Application withdrawn: id={}", application_id);
        Ok(StudentApplicationDto {
            status: ApplicationStatus::Withdrawn,
            updated_at: Utc::now(),
            ..current
        })
    }

    /// Applications to one of the recruiter's jobs
    pub async fn list_for_job(
        &self,
        recruiter_id: Uuid,
        job_id: Uuid,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<ApplicantDto>> {
        self.jobs.find_owned(recruiter_id, job_id).await?;

        sqlx::query_as::<_, ApplicantDto>(&format!(
            r#"
            {APPLICANT_SELECT}
            WHERE a.job_id = $1
              AND ($2::application_status IS NULL OR a.status = $2)
            ORDER BY a.applied_at DESC
            "#
        ))
        .bind(job_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list job applications: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Change the status (and notes) of an application to one of the recruiter's jobs
    pub async fn update_status(
        &self,
        recruiter_id: Uuid,
        application_id: Uuid,
        dto: UpdateApplicationStatusDto,
    ) -> Result<ApplicantDto> {
        let current = self.find_for_recruiter(recruiter_id, application_id).await?;

        if let Err(e) = check_recruiter_update(current.status, dto.status) {
            tracing::warn!(
                "Refused status change: application={}, {} -> {}",
                application_id,
                current.status,
                dto.status
            );
            return Err(e);
        }

        let notes = dto.recruiter_notes.or(current.recruiter_notes);

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE job_applications
            SET status = $2, recruiter_notes = $3, updated_at = NOW()
            WHERE id = $1 AND status <> $4
            RETURNING id
            "#,
        )
        .bind(application_id)
        .bind(dto.status)
        .bind(&notes)
        .bind(ApplicationStatus::Withdrawn)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update application status: {:?}", e);
            AppError::Database(e)
        })?;

        if updated.is_none() {
            return Err(AppError::Conflict(
                "This application was withdrawn by the student and cannot be changed.".to_string(),
            ));
        }

        tracing::info!(
            "Application status updated: id={}, {} -> {}",
            application_id,
            current.status,
            dto.status
        );

        self.find_for_recruiter(recruiter_id, application_id).await
    }

    async fn find_for_recruiter(
        &self,
        recruiter_id: Uuid,
        application_id: Uuid,
    ) -> Result<ApplicantDto> {
        sqlx::query_as::<_, ApplicantDto>(&format!(
            "{APPLICANT_SELECT} WHERE a.id = $1 AND c.recruiter_id = $2"
        ))
        .bind(application_id)
        .bind(recruiter_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get application: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Application '{}' not found", application_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::UserRole;
    use crate::features::branches::BranchService;
    use crate::features::companies::CompanyService;
    use crate::shared::test_helpers::{
        insert_company, insert_job, insert_student_profile, insert_user, MemoryStorage,
    };
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn service(pool: &PgPool) -> ApplicationService {
        let students = Arc::new(StudentService::new(
            pool.clone(),
            Arc::new(MemoryStorage::default()),
            "resumes".to_string(),
        ));
        let jobs = Arc::new(JobService::new(
            pool.clone(),
            Arc::new(CompanyService::new(pool.clone())),
            Arc::new(BranchService::new(pool.clone())),
            students.clone(),
        ));
        ApplicationService::new(pool.clone(), jobs, students)
    }

    /// A student with `cgpa` and an approved company's job requiring 7.00, closing in `days`
    async fn student_and_job(pool: &PgPool, cgpa: Decimal, days: i64) -> (Uuid, Uuid, Uuid) {
        let student = insert_user(pool, UserRole::Student).await;
        insert_student_profile(pool, student, cgpa).await;

        let recruiter = insert_user(pool, UserRole::Recruiter).await;
        let company = insert_company(pool, recruiter, true).await;
        let job = insert_job(
            pool,
            company,
            Decimal::new(700, 2),
            Utc::now() + Duration::days(days),
        )
        .await;

        (student, recruiter, job)
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_second_application_is_a_conflict(pool: PgPool) {
        let service = service(&pool);
        let (student, _, job) = student_and_job(&pool, Decimal::new(850, 2), 7).await;

        let first = service.apply(student, job, ApplyDto::default()).await.unwrap();
        assert_eq!(first.status, ApplicationStatus::Pending);

        let second = service.apply(student, job, ApplyDto::default()).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_is_reported_even_after_deadline(pool: PgPool) {
        let service = service(&pool);
        let (student, _, job) = student_and_job(&pool, Decimal::new(850, 2), 7).await;
        service.apply(student, job, ApplyDto::default()).await.unwrap();

        sqlx::query("UPDATE job_postings SET deadline = NOW() - INTERVAL '1 day' WHERE id = $1")
            .bind(job)
            .execute(&pool)
            .await
            .unwrap();

        let again = service.apply(student, job, ApplyDto::default()).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_apply_after_deadline_is_refused(pool: PgPool) {
        let service = service(&pool);
        let (student, _, job) = student_and_job(&pool, Decimal::new(850, 2), -1).await;

        match service.apply(student, job, ApplyDto::default()).await {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "This job is no longer accepting applications.")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_ineligible_student_gets_the_reason(pool: PgPool) {
        let service = service(&pool);
        let (student, _, job) = student_and_job(&pool, Decimal::new(650, 2), 7).await;

        match service.apply(student, job, ApplyDto::default()).await {
            Err(AppError::BadRequest(msg)) => {
                assert!(
                    msg.starts_with("You are not eligible: CGPA requirement not met"),
                    "{msg}"
                )
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_applications")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_recruiter_cannot_change_withdrawn_application(pool: PgPool) {
        let service = service(&pool);
        let (student, recruiter, job) = student_and_job(&pool, Decimal::new(850, 2), 7).await;

        let application = service.apply(student, job, ApplyDto::default()).await.unwrap();
        let withdrawn = service.withdraw(student, application.id).await.unwrap();
        assert_eq!(withdrawn.status, ApplicationStatus::Withdrawn);

        let result = service
            .update_status(
                recruiter,
                application.id,
                UpdateApplicationStatusDto {
                    status: ApplicationStatus::Shortlisted,
                    recruiter_notes: Some("Strong profile".to_string()),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let status: ApplicationStatus =
            sqlx::query_scalar("SELECT status FROM job_applications WHERE id = $1")
                .bind(application.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, ApplicationStatus::Withdrawn);
    }
}
