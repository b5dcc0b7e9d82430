use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::features::drives::handlers;
use crate::features::drives::services::DriveService;

/// Placement drive routes (require authentication)
pub fn routes(service: Arc<DriveService>) -> Router {
    Router::new()
        .route("/api/drives", get(handlers::list_active_drives))
        .route("/api/drives/{id}", get(handlers::get_drive))
        .route(
            "/api/admin/drives",
            get(handlers::list_all_drives).post(handlers::create_drive),
        )
        .route(
            "/api/admin/drives/{id}/companies",
            post(handlers::add_drive_company),
        )
        .route(
            "/api/admin/drives/{id}/companies/{company_id}",
            delete(handlers::remove_drive_company),
        )
        .route("/api/admin/drives/{id}/active", put(handlers::set_drive_active))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::shared::test_helpers::{
        create_admin_user, create_recruiter_user, create_student_user, lazy_pool, with_user,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server_as(user: AuthenticatedUser) -> TestServer {
        let service = Arc::new(DriveService::new(lazy_pool()));
        TestServer::new(with_user(routes(service), user)).unwrap()
    }

    #[tokio::test]
    async fn test_drive_list_requires_authentication() {
        let service = Arc::new(DriveService::new(lazy_pool()));
        let server = TestServer::new(routes(service)).unwrap();

        let response = server.get("/api/drives").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_recruiter_cannot_create_drive() {
        let server = server_as(create_recruiter_user());

        let response = server
            .post("/api/admin/drives")
            .json(&json!({
                "title": "Winter Placements",
                "description": "Core companies",
                "start_date": "2026-12-01",
                "end_date": "2026-12-15"
            }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_inverted_drive_dates_are_rejected() {
        let server = server_as(create_admin_user());

        let response = server
            .post("/api/admin/drives")
            .json(&json!({
                "title": "Winter Placements",
                "description": "Core companies",
                "start_date": "2026-12-15",
                "end_date": "2026-12-01"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Validation failed");
    }

    #[tokio::test]
    async fn test_student_cannot_toggle_drive() {
        let server = server_as(create_student_user());

        let response = server
            .put(&format!("/api/admin/drives/{}/active", uuid::Uuid::new_v4()))
            .json(&json!({ "is_active": false }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }
}
