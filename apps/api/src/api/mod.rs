// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};

pub use errors::ApiError;
pub use state::AppState;

use handlers::{health, pull_requests, stats, users};

/// Builds the HTTP router with every route bound to `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Pull request routes
        .route("/pullRequest/create", post(pull_requests::create_pull_request))
        .route("/pullRequest/merge", post(pull_requests::merge_pull_request))
        .route("/pullRequest/reassign", post(pull_requests::reassign_reviewer))
        .route("/pullRequest/:id", get(pull_requests::get_pull_request))
        // User routes
        .route("/users/getReview", get(users::get_reviews))
        // Statistics routes
        .route("/stats/reviewers", get(stats::reviewer_stats))
        .route("/stats/pullRequests", get(stats::pull_request_stats))
        .with_state(state)
}
