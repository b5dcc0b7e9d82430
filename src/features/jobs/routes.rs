use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::jobs::handlers;
use crate::features::jobs::services::JobService;

/// Job routes (require authentication)
pub fn routes(service: Arc<JobService>) -> Router {
    Router::new()
        .route("/api/jobs", get(handlers::browse_jobs))
        .route("/api/jobs/{id}", get(handlers::get_job))
        .route(
            "/api/recruiter/jobs",
            get(handlers::list_my_jobs).post(handlers::create_job),
        )
        .route("/api/recruiter/jobs/{id}", put(handlers::update_job))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::branches::BranchService;
    use crate::features::companies::CompanyService;
    use crate::features::students::StudentService;
    use crate::shared::test_helpers::{
        create_recruiter_user, create_student_user, lazy_pool, with_user, MemoryStorage,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server_as(user: AuthenticatedUser) -> TestServer {
        let pool = lazy_pool();
        let students = Arc::new(StudentService::new(
            pool.clone(),
            Arc::new(MemoryStorage::default()),
            "resumes".to_string(),
        ));
        let service = Arc::new(JobService::new(
            pool.clone(),
            Arc::new(CompanyService::new(pool.clone())),
            Arc::new(BranchService::new(pool)),
            students,
        ));
        TestServer::new(with_user(routes(service), user)).unwrap()
    }

    #[tokio::test]
    async fn test_student_cannot_post_jobs() {
        let server = server_as(create_student_user());

        let response = server.post("/api/recruiter/jobs").json(&json!({})).await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_recruiter_cannot_browse_student_job_board() {
        let server = server_as(create_recruiter_user());

        let response = server.get("/api/jobs").await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_inverted_package_range_is_rejected() {
        let server = server_as(create_recruiter_user());

        let response = server
            .post("/api/recruiter/jobs")
            .json(&json!({
                "company_id": uuid::Uuid::new_v4(),
                "title": "SDE",
                "description": "Build things",
                "location": "Remote",
                "package_min": "20",
                "package_max": "10",
                "minimum_cgpa": "7",
                "required_skills": "Rust",
                "deadline": "2030-01-01T00:00:00Z"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_company_filter_is_bad_request() {
        let server = server_as(create_student_user());

        let response = server.get("/api/jobs?company=not-a-uuid").await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
