/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// DASHBOARD LIMITS
// =============================================================================

/// Eligible jobs shown on the student dashboard
pub const STUDENT_DASHBOARD_JOBS: usize = 5;

/// Recent applications shown on the student dashboard
pub const STUDENT_DASHBOARD_APPLICATIONS: i64 = 5;

/// Recent applications shown on the recruiter and admin dashboards
pub const RECENT_APPLICATIONS_LIMIT: i64 = 10;

/// Companies awaiting approval shown on the admin dashboard
pub const PENDING_COMPANIES_LIMIT: i64 = 5;

/// Companies listed in the placement statistics
pub const TOP_PLACEMENT_COMPANIES: i64 = 10;

// =============================================================================
// RESUMES
// =============================================================================

/// Maximum resume size in bytes (5MB)
pub const MAX_RESUME_SIZE: usize = 5 * 1024 * 1024;

/// The only content type accepted for resumes
pub const RESUME_CONTENT_TYPE: &str = "application/pdf";
