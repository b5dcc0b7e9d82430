use std::sync::Arc;

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::applications::dtos::{
    ApplicantDto, StudentApplicationDto, APPLICANT_SELECT, STUDENT_APPLICATION_SELECT,
};
use crate::features::companies::CompanyService;
use crate::features::dashboard::dtos::{
    PlacementSummaryDto, RecruiterDashboardDto, StudentDashboardDto,
};
use crate::features::jobs::dtos::{JobSearchParams, StudentJobDto};
use crate::features::jobs::JobService;
use crate::features::students::StudentService;
use crate::shared::constants::{
    RECENT_APPLICATIONS_LIMIT, STUDENT_DASHBOARD_APPLICATIONS, STUDENT_DASHBOARD_JOBS,
};

#[derive(FromRow)]
struct ApplicationCounts {
    total: i64,
    pending: i64,
}

#[derive(FromRow)]
struct RecruiterCounts {
    total_jobs: i64,
    active_jobs: i64,
    total_applications: i64,
    pending_applications: i64,
}

/// Keep only eligible jobs; returns their count and the first `limit` of them
pub fn top_eligible(jobs: Vec<StudentJobDto>, limit: usize) -> (i64, Vec<StudentJobDto>) {
    let eligible: Vec<StudentJobDto> = jobs.into_iter().filter(|j| j.is_eligible).collect();
    let count = eligible.len() as i64;
    (count, eligible.into_iter().take(limit).collect())
}

/// Service for role dashboards
pub struct DashboardService {
    pool: PgPool,
    jobs: Arc<JobService>,
    students: Arc<StudentService>,
    companies: Arc<CompanyService>,
}

impl DashboardService {
    pub fn new(
        pool: PgPool,
        jobs: Arc<JobService>,
        students: Arc<StudentService>,
        companies: Arc<CompanyService>,
    ) -> Self {
        Self {
            pool,
            jobs,
            students,
            companies,
        }
    }

    /// Public headline numbers
    pub async fn summary(&self) -> Result<PlacementSummaryDto> {
        sqlx::query_as::<_, PlacementSummaryDto>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM student_profiles) AS total_students,
                (SELECT COUNT(*) FROM companies WHERE is_approved) AS approved_companies,
                (SELECT COUNT(*) FROM job_postings WHERE is_active) AS active_jobs,
                (SELECT COUNT(*) FROM student_profiles WHERE is_placed) AS placed_students
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get placement summary: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn student(&self, user_id: Uuid) -> Result<StudentDashboardDto> {
        let profile = self.students.require_profile(user_id).await?;

        let open_jobs = self
            .jobs
            .open_jobs_for(&profile, &JobSearchParams::default())
            .await?;
        let (eligible_jobs_count, eligible_jobs) = top_eligible(open_jobs, STUDENT_DASHBOARD_JOBS);

        let counts = sqlx::query_as::<_, ApplicationCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending
            FROM job_applications
            WHERE student_id = $1
            "#,
        )
        .bind(profile.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count student applications: {:?}", e);
            AppError::Database(e)
        })?;

        let recent_applications = sqlx::query_as::<_, StudentApplicationDto>(&format!(
            "{STUDENT_APPLICATION_SELECT} WHERE a.student_id = $1 ORDER BY a.applied_at DESC LIMIT $2"
        ))
        .bind(profile.id)
        .bind(STUDENT_DASHBOARD_APPLICATIONS)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get recent student applications: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(StudentDashboardDto {
            profile: profile.into(),
            eligible_jobs_count,
            eligible_jobs,
            total_applications: counts.total,
            pending_applications: counts.pending,
            recent_applications,
        })
    }

    pub async fn recruiter(&self, recruiter_id: Uuid) -> Result<RecruiterDashboardDto> {
        let companies = self.companies.list_own(recruiter_id).await?;

        let counts = sqlx::query_as::<_, RecruiterCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM job_postings j
                  JOIN companies c ON c.id = j.company_id
                  WHERE c.recruiter_id = $1) AS total_jobs,
                (SELECT COUNT(*) FROM job_postings j
                  JOIN companies c ON c.id = j.company_id
                  WHERE c.recruiter_id = $1 AND j.is_active AND j.deadline >= NOW()) AS active_jobs,
                (SELECT COUNT(*) FROM job_applications a
                  JOIN job_postings j ON j.id = a.job_id
                  JOIN companies c ON c.id = j.company_id
                  WHERE c.recruiter_id = $1) AS total_applications,
                (SELECT COUNT(*) FROM job_applications a
                  JOIN job_postings j ON j.id = a.job_id
                  JOIN companies c ON c.id = j.company_id
                  WHERE c.recruiter_id = $1 AND a.status = 'pending') AS pending_applications
            "#,
        )
        .bind(recruiter_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count recruiter activity: {:?}", e);
            AppError::Database(e)
        })?;

        let recent_applications = sqlx::query_as::<_, ApplicantDto>(&format!(
            "{APPLICANT_SELECT} WHERE c.recruiter_id = $1 ORDER BY a.applied_at DESC LIMIT $2"
        ))
        .bind(recruiter_id)
        .bind(RECENT_APPLICATIONS_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get recent recruiter applications: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(RecruiterDashboardDto {
            companies,
            total_jobs: counts.total_jobs,
            active_jobs: counts.active_jobs,
            total_applications: counts.total_applications,
            pending_applications: counts.pending_applications,
            recent_applications,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::jobs::dtos::JobDto;
    use crate::features::jobs::eligibility::Eligibility;
    use crate::features::jobs::models::JobType;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn student_job(title: &str, eligible: bool) -> StudentJobDto {
        let job = JobDto {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            company_name: "Acme".to_string(),
            title: title.to_string(),
            description: String::new(),
            job_type: JobType::Internship,
            location: "Chennai".to_string(),
            package_min: Decimal::new(3, 0),
            package_max: Decimal::new(5, 0),
            minimum_cgpa: Decimal::new(6, 0),
            maximum_backlogs: 1,
            allowed_branches: vec![],
            allowed_years: vec![3, 4],
            required_skills: String::new(),
            deadline: Utc::now() + Duration::days(7),
            vacancies: 2,
            is_active: true,
            bond_details: None,
            selection_process: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let eligibility = Eligibility {
            is_eligible: eligible,
            eligibility_message: String::new(),
            year_matches: true,
        };
        StudentJobDto::new(job, eligibility, false)
    }

    #[test]
    fn test_top_eligible_counts_all_but_keeps_limit() {
        let jobs: Vec<StudentJobDto> = (0..8)
            .map(|i| student_job(&format!("job-{i}"), i % 4 != 3))
            .collect();

        let (count, top) = top_eligible(jobs, 5);

        assert_eq!(count, 6);
        assert_eq!(top.len(), 5);
        assert!(top.iter().all(|j| j.is_eligible));
        assert_eq!(top[0].job.title, "job-0");
    }

    #[test]
    fn test_top_eligible_with_no_matches() {
        let (count, top) = top_eligible(vec![student_job("only", false)], 5);
        assert_eq!(count, 0);
        assert!(top.is_empty());
    }
}
