use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::students::handlers;
use crate::features::students::services::StudentService;

/// Student profile routes (require authentication)
pub fn routes(service: Arc<StudentService>) -> Router {
    Router::new()
        .route(
            "/api/students/me",
            get(handlers::get_my_profile).put(handlers::upsert_my_profile),
        )
        .route(
            "/api/students/me/resume",
            get(handlers::download_my_resume).post(handlers::upload_resume),
        )
        .route(
            "/api/students/{id}/resume",
            get(handlers::download_student_resume),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        create_recruiter_user, create_student_user, lazy_pool, with_user, MemoryStorage,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server_as(user: crate::features::auth::model::AuthenticatedUser) -> TestServer {
        let service = Arc::new(StudentService::new(
            lazy_pool(),
            Arc::new(MemoryStorage::default()),
            "resumes".to_string(),
        ));
        TestServer::new(with_user(routes(service), user)).unwrap()
    }

    #[tokio::test]
    async fn test_recruiter_cannot_edit_student_profile() {
        let server = server_as(create_recruiter_user());

        let response = server.get("/api/students/me").await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_profile_is_rejected_before_saving() {
        let server = server_as(create_student_user());

        let response = server
            .put("/api/students/me")
            .json(&json!({
                "enrollment_number": "21CSE042",
                "gender": "female",
                "branch_code": "CSE",
                "year": 7,
                "cgpa": "11.5",
                "backlogs": 0,
                "tenth_percentage": "90",
                "twelfth_percentage": "90",
                "skills": "Rust"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        let errors = body["errors"].as_array().unwrap();
        assert!(errors.iter().any(|e| e.as_str().unwrap().starts_with("year:")));
        assert!(errors.iter().any(|e| e.as_str().unwrap().starts_with("cgpa:")));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let server = server_as(create_student_user());

        let response = server
            .put("/api/students/me")
            .content_type("application/json")
            .text("{not json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_student_cannot_download_other_resumes() {
        let server = server_as(create_student_user());

        let response = server
            .get(&format!("/api/students/{}/resume", uuid::Uuid::new_v4()))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }
}
