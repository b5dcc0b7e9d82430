use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::applications::handlers;
use crate::features::applications::services::ApplicationService;

/// Application routes (require authentication)
pub fn routes(service: Arc<ApplicationService>) -> Router {
    Router::new()
        .route("/api/jobs/{id}/apply", post(handlers::apply_to_job))
        .route("/api/applications", get(handlers::list_my_applications))
        .route(
            "/api/applications/{id}/withdraw",
            post(handlers::withdraw_application),
        )
        .route(
            "/api/recruiter/jobs/{id}/applications",
            get(handlers::list_job_applications),
        )
        .route(
            "/api/recruiter/applications/{id}/status",
            put(handlers::update_application_status),
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
        create_admin_user, create_recruiter_user, create_student_user, lazy_pool, with_user,
        MemoryStorage,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use uuid::Uuid;

    fn server_as(user: AuthenticatedUser) -> TestServer {
        let pool = lazy_pool();
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
        let service = Arc::new(ApplicationService::new(pool, jobs, students));
        TestServer::new(with_user(routes(service), user)).unwrap()
    }

    #[tokio::test]
    async fn test_recruiter_cannot_apply() {
        let server = server_as(create_recruiter_user());

        let response = server
            .post(&format!("/api/jobs/{}/apply", Uuid::new_v4()))
            .json(&json!({}))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_oversized_cover_letter_is_rejected() {
        let server = server_as(create_student_user());

        let response = server
            .post(&format!("/api/jobs/{}/apply", Uuid::new_v4()))
            .json(&json!({ "cover_letter": "x".repeat(5001) }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_student_cannot_set_application_status() {
        let server = server_as(create_student_user());

        let response = server
            .put(&format!("/api/recruiter/applications/{}/status", Uuid::new_v4()))
            .json(&json!({ "status": "accepted" }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_status_is_bad_request() {
        let server = server_as(create_recruiter_user());

        let response = server
            .put(&format!("/api/recruiter/applications/{}/status", Uuid::new_v4()))
            .json(&json!({ "status": "hired" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_cannot_withdraw_for_student() {
        let server = server_as(create_admin_user());

        let response = server
            .post(&format!("/api/applications/{}/withdraw", Uuid::new_v4()))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_bad_status_filter_is_bad_request() {
        let server = server_as(create_student_user());

        let response = server.get("/api/applications?status=hired").await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
