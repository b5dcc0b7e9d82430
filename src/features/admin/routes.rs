use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Admin back office routes (admin role required)
pub fn routes(admin_service: Arc<AdminService>) -> Router {
    Router::new()
        .route("/api/admin/dashboard", get(handlers::get_admin_dashboard))
        .route("/api/admin/statistics", get(handlers::get_statistics))
        .route("/api/admin/students", get(handlers::list_students))
        .route(
            "/api/admin/students/{id}/placement",
            put(handlers::update_student_placement),
        )
        .with_state(admin_service)
}
