use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::companies::handlers;
use crate::features::companies::services::CompanyService;

/// Public company routes
pub fn public_routes(service: Arc<CompanyService>) -> Router {
    Router::new()
        .route("/api/companies", get(handlers::list_approved_companies))
        .with_state(service)
}

/// Recruiter and admin company routes (require authentication)
pub fn protected_routes(service: Arc<CompanyService>) -> Router {
    Router::new()
        .route("/api/companies", post(handlers::create_company))
        .route("/api/companies/mine", get(handlers::list_my_companies))
        .route("/api/companies/{id}", put(handlers::update_company))
        .route("/api/admin/companies", get(handlers::list_all_companies))
        .route(
            "/api/admin/companies/{id}/approval",
            post(handlers::set_company_approval),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        create_admin_user, create_recruiter_user, create_student_user, lazy_pool, with_user,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server_as(user: crate::features::auth::model::AuthenticatedUser) -> TestServer {
        let service = Arc::new(CompanyService::new(lazy_pool()));
        TestServer::new(with_user(protected_routes(service), user)).unwrap()
    }

    #[tokio::test]
    async fn test_student_cannot_register_company() {
        let server = server_as(create_student_user());

        let response = server
            .post("/api/companies")
            .json(&json!({ "name": "Acme" }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_company_is_rejected() {
        let server = server_as(create_recruiter_user());

        let response = server
            .post("/api/companies")
            .json(&json!({
                "name": "Acme",
                "description": "Robots",
                "industry": "Manufacturing",
                "location": "Pune",
                "contact_person": "Hema",
                "contact_email": "not-an-email",
                "contact_phone": "+91 98450 12345"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recruiter_cannot_approve_companies() {
        let server = server_as(create_recruiter_user());

        let response = server
            .post(&format!("/api/admin/companies/{}/approval", uuid::Uuid::new_v4()))
            .json(&json!({ "action": "approve" }))
            .await;

        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_approval_filter_is_bad_request() {
        let server = server_as(create_admin_user());

        let response = server.get("/api/admin/companies?approval=maybe").await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
