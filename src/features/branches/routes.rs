use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::branches::handlers;
use crate::features::branches::services::BranchService;

/// Public branch routes
pub fn public_routes(service: Arc<BranchService>) -> Router {
    Router::new()
        .route("/api/branches", get(handlers::list_branches))
        .with_state(service)
}

/// Branch administration (requires authentication)
pub fn protected_routes(service: Arc<BranchService>) -> Router {
    Router::new()
        .route("/api/branches", post(handlers::create_branch))
        .with_state(service)
}
