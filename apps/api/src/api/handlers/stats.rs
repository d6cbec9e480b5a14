use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::users::UserQuery;
use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::services::{PullRequestStats, ReviewerStats};

#[derive(Debug, Serialize)]
pub struct ReviewerStatsResponse {
    pub users: Vec<ReviewerStats>,
    pub total_pull_requests: usize,
}

/// Assignment statistics for every reviewer, or for one with `?user_id=`
///
/// GET /stats/reviewers
pub async fn reviewer_stats(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;

    if let Some(user_id) = query.user_id() {
        let stats = state.assignments.reviewer_statistics_for(&user_id).await?;
        return Ok(Json(stats).into_response());
    }

    let users = state.assignments.reviewer_statistics().await?;
    let totals = state.assignments.pull_request_statistics().await?;

    Ok(Json(ReviewerStatsResponse {
        users,
        total_pull_requests: totals.total_pull_requests,
    })
    .into_response())
}

/// Totals across all pull requests
///
/// GET /stats/pullRequests
pub async fn pull_request_stats(
    State(state): State<AppState>,
) -> Result<Json<PullRequestStats>, ApiError> {
    let stats = state.assignments.pull_request_statistics().await?;
    Ok(Json(stats))
}
