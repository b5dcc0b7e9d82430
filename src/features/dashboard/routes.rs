use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Public dashboard routes
pub fn public_routes(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/dashboard/summary", get(handlers::get_summary))
        .with_state(service)
}

/// Role dashboards (require authentication)
pub fn protected_routes(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/dashboard/student", get(handlers::get_student_dashboard))
        .route(
            "/api/dashboard/recruiter",
            get(handlers::get_recruiter_dashboard),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::branches::BranchService;
    use crate::features::companies::CompanyService;
    use crate::features::jobs::JobService;
    use crate::features::students::StudentService;
    use crate::shared::test_helpers::{
        create_admin_user, create_recruiter_user, lazy_pool, with_user, MemoryStorage,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;

    fn service() -> Arc<DashboardService> {
        let pool = lazy_pool();
        let students = Arc::new(StudentService::new(
            pool.clone(),
            Arc::new(MemoryStorage::default()),
            "resumes".to_string(),
        ));
        let companies = Arc::new(CompanyService::new(pool.clone()));
        let jobs = Arc::new(JobService::new(
            pool.clone(),
            companies.clone(),
            Arc::new(BranchService::new(pool.clone())),
            students.clone(),
        ));
        Arc::new(DashboardService::new(pool, jobs, students, companies))
    }

    fn server_as(user: AuthenticatedUser) -> TestServer {
        TestServer::new(with_user(protected_routes(service()), user)).unwrap()
    }

    #[tokio::test]
    async fn test_recruiter_cannot_open_student_dashboard() {
        let server = server_as(create_recruiter_user());

        let response = server.get("/api/dashboard/student").await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_cannot_open_recruiter_dashboard() {
        let server = server_as(create_admin_user());

        let response = server.get("/api/dashboard/recruiter").await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_role_dashboards_require_authentication() {
        let server = TestServer::new(protected_routes(service())).unwrap();

        let response = server.get("/api/dashboard/student").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
