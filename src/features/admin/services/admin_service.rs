use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::*;
use crate::features::applications::dtos::{ApplicantDto, APPLICANT_SELECT};
use crate::features::companies::dtos::CompanyDto;
use crate::features::companies::models::{Company, COMPANY_COLUMNS};
use crate::features::students::dtos::StudentProfileDto;
use crate::features::students::models::{StudentProfile, PROFILE_COLUMNS};
use crate::shared::constants::{
    PENDING_COMPANIES_LIMIT, RECENT_APPLICATIONS_LIMIT, TOP_PLACEMENT_COMPANIES,
};
use crate::shared::types::search_pattern;

/// CGPA buckets as (label, inclusive lower bound in tenths), highest first
const CGPA_BUCKETS: [(&str, i64); 5] = [
    ("9.0 - 10.0", 90),
    ("8.0 - 8.9", 80),
    ("7.0 - 7.9", 70),
    ("6.0 - 6.9", 60),
    ("Below 6.0", 0),
];

/// Placed students as a percentage of all students, rounded to two decimals
pub fn placement_percentage(placed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let percentage = placed as f64 / total as f64 * 100.0;
    (percentage * 100.0).round() / 100.0
}

/// Count CGPAs per bucket; every bucket is present even when empty
pub fn cgpa_distribution(cgpas: impl IntoIterator<Item = Decimal>) -> Vec<CgpaBucketDto> {
    let mut counts = [0i64; CGPA_BUCKETS.len()];

    for cgpa in cgpas {
        let index = CGPA_BUCKETS
            .iter()
            .position(|(_, lower)| cgpa >= Decimal::new(*lower, 1))
            .unwrap_or(CGPA_BUCKETS.len() - 1);
        counts[index] += 1;
    }

    CGPA_BUCKETS
        .iter()
        .zip(counts)
        .map(|((label, _), count)| CgpaBucketDto {
            range: label.to_string(),
            count,
        })
        .collect()
}

const STUDENT_ROW_SELECT: &str = r#"
    SELECT sp.id, sp.user_id, sp.enrollment_number, sp.date_of_birth, sp.gender,
           sp.branch_code, sp.year, sp.cgpa, sp.backlogs, sp.tenth_percentage,
           sp.twelfth_percentage, sp.skills, sp.certifications, sp.projects, sp.resume_key,
           sp.resume_uploaded_at, sp.is_placed, sp.placement_company, sp.placement_package,
           sp.created_at, sp.updated_at, u.first_name, u.last_name, u.email
    FROM student_profiles sp
    JOIN users u ON u.id = sp.user_id
"#;

const STUDENT_FILTERS: &str = r#"
    WHERE ($1::text IS NULL OR sp.branch_code = $1)
      AND ($2::smallint IS NULL OR sp.year = $2)
      AND ($3::boolean IS NULL OR sp.is_placed = $3)
      AND ($4::text IS NULL
           OR u.first_name ILIKE $4 OR u.last_name ILIKE $4 OR sp.enrollment_number ILIKE $4)
"#;

/// Service for the placement office back office
pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // DASHBOARD
    // =========================================================================

    pub async fn dashboard(&self) -> Result<AdminDashboardDto> {
        let totals = sqlx::query_as::<_, AdminTotalsDto>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM student_profiles) AS total_students,
                (SELECT COUNT(*) FROM companies) AS total_companies,
                (SELECT COUNT(*) FROM companies WHERE is_approved) AS approved_companies,
                (SELECT COUNT(*) FROM job_postings) AS total_jobs,
                (SELECT COUNT(*) FROM job_postings
                  WHERE is_active AND deadline >= NOW()) AS active_jobs,
                (SELECT COUNT(*) FROM student_profiles WHERE is_placed) AS placed_students,
                (SELECT COUNT(*) FROM job_applications) AS total_applications,
                (SELECT COUNT(*) FROM job_applications
                  WHERE status = 'pending') AS pending_applications
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get admin totals: {:?}", e);
            AppError::Database(e)
        })?;

        let recent_applications = sqlx::query_as::<_, ApplicantDto>(&format!(
            "{APPLICANT_SELECT} ORDER BY a.applied_at DESC LIMIT $1"
        ))
        .bind(RECENT_APPLICATIONS_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get recent applications: {:?}", e);
            AppError::Database(e)
        })?;

        let pending_companies = sqlx::query_as::<_, Company>(&format!(
            r#"
            SELECT {COMPANY_COLUMNS} FROM companies
            WHERE NOT is_approved
            ORDER BY created_at ASC
            LIMIT $1
            "#
        ))
        .bind(PENDING_COMPANIES_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get pending companies: {:?}", e);
            AppError::Database(e)
        })?;

        let branch_stats = sqlx::query_as::<_, BranchStatDto>(
            r#"
            SELECT branch_code,
                   COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE is_placed) AS placed,
                   ROUND(AVG(cgpa), 2) AS avg_cgpa
            FROM student_profiles
            GROUP BY branch_code
            ORDER BY branch_code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get branch stats: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(AdminDashboardDto {
            placement_percentage: placement_percentage(
                totals.placed_students,
                totals.total_students,
            ),
            totals,
            recent_applications,
            pending_companies: pending_companies.into_iter().map(CompanyDto::from).collect(),
            branch_stats,
        })
    }

    // =========================================================================
    // STATISTICS
    // =========================================================================

    pub async fn statistics(&self) -> Result<StatisticsDto> {
        let branch_stats = sqlx::query_as::<_, BranchPlacementStatDto>(
            r#"
            SELECT branch_code,
                   COUNT(*) AS total_students,
                   COUNT(*) FILTER (WHERE is_placed) AS placed_students,
                   ROUND(AVG(cgpa), 2) AS avg_cgpa,
                   ROUND(AVG(placement_package) FILTER (WHERE is_placed), 2) AS avg_package
            FROM student_profiles
            GROUP BY branch_code
            ORDER BY branch_code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get branch placement stats: {:?}", e);
            AppError::Database(e)
        })?;

        let company_stats = sqlx::query_as::<_, CompanyPlacementDto>(
            r#"
            SELECT placement_company, COUNT(*) AS count
            FROM student_profiles
            WHERE is_placed AND placement_company IS NOT NULL
            GROUP BY placement_company
            ORDER BY count DESC, placement_company
            LIMIT $1
            "#,
        )
        .bind(TOP_PLACEMENT_COMPANIES)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get company placement stats: {:?}", e);
            AppError::Database(e)
        })?;

        let cgpas: Vec<Decimal> = sqlx::query_scalar("SELECT cgpa FROM student_profiles")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get CGPA values: {:?}", e);
                AppError::Database(e)
            })?;

        let total_students: i64 = branch_stats.iter().map(|b| b.total_students).sum();
        let placed_students: i64 = branch_stats.iter().map(|b| b.placed_students).sum();

        Ok(StatisticsDto {
            total_students,
            placed_students,
            placement_percentage: placement_percentage(placed_students, total_students),
            branch_stats,
            company_stats,
            cgpa_distribution: cgpa_distribution(cgpas),
        })
    }

    // =========================================================================
    // STUDENTS
    // =========================================================================

    /// Filtered, paginated student list ordered by CGPA then backlogs
    pub async fn list_students(
        &self,
        params: &StudentQueryParams,
    ) -> Result<(Vec<AdminStudentDto>, i64)> {
        let page = params.pagination();
        let branch = params
            .branch
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_uppercase);
        let placed = params.placement.map(|p| p.is_placed());
        let search = search_pattern(params.search.as_deref());

        let total: i64 = sqlx::query_scalar(&format!(
            r#"
            SELECT COUNT(*)
            FROM student_profiles sp
            JOIN users u ON u.id = sp.user_id
            {STUDENT_FILTERS}
            "#
        ))
        .bind(&branch)
        .bind(params.year)
        .bind(placed)
        .bind(&search)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count students: {:?}", e);
            AppError::Database(e)
        })?;

        let rows = sqlx::query_as::<_, AdminStudentRow>(&format!(
            r#"
            {STUDENT_ROW_SELECT}
            {STUDENT_FILTERS}
            ORDER BY sp.cgpa DESC, sp.backlogs ASC, sp.enrollment_number ASC
            OFFSET $5 LIMIT $6
            "#
        ))
        .bind(&branch)
        .bind(params.year)
        .bind(placed)
        .bind(&search)
        .bind(page.offset())
        .bind(page.limit())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list students: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// Record a student's placement outcome
    pub async fn update_placement(
        &self,
        student_id: Uuid,
        dto: UpdatePlacementDto,
    ) -> Result<StudentProfileDto> {
        let profile = sqlx::query_as::<_, StudentProfile>(&format!(
            r#"
            UPDATE student_profiles
            SET is_placed = $2, placement_company = $3, placement_package = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(student_id)
        .bind(dto.is_placed)
        .bind(&dto.placement_company)
        .bind(dto.placement_package)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update placement status: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Student '{}' not found", student_id)))?;

        tracing::info!(
            "Placement status updated: student={}, placed={}, company={:?}",
            profile.id,
            profile.is_placed,
            profile.placement_company
        );
        Ok(profile.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_placement_percentage_rounds_to_two_decimals() {
        assert_eq!(placement_percentage(1, 3), 33.33);
        assert_eq!(placement_percentage(2, 3), 66.67);
        assert_eq!(placement_percentage(5, 5), 100.0);
    }

    #[test]
    fn test_placement_percentage_without_students() {
        assert_eq!(placement_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_cgpa_distribution_boundaries() {
        let buckets = cgpa_distribution(
            ["10.00", "9.00", "8.99", "8.00", "7.95", "6.00", "5.99", "0"]
                .into_iter()
                .map(dec),
        );

        let counts: Vec<(&str, i64)> = buckets
            .iter()
            .map(|b| (b.range.as_str(), b.count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("9.0 - 10.0", 2),
                ("8.0 - 8.9", 2),
                ("7.0 - 7.9", 1),
                ("6.0 - 6.9", 1),
                ("Below 6.0", 2),
            ]
        );
    }

    #[test]
    fn test_cgpa_distribution_lists_empty_buckets() {
        let buckets = cgpa_distribution(Vec::new());
        assert_eq!(buckets.len(), 5);
        assert!(buckets.iter().all(|b| b.count == 0));
    }
}
