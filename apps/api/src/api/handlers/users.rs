use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::pull_request::{PullRequest, PullRequestId, PullRequestStatus};
use crate::domain::user::UserId;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

impl UserQuery {
    /// The `user_id` parameter, if present and non-blank
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(UserId::from)
    }
}

/// Pull request summary listed in a reviewer's queue
#[derive(Debug, Serialize)]
pub struct PullRequestShort {
    pub pull_request_id: PullRequestId,
    pub pull_request_name: String,
    pub author_id: UserId,
    pub status: PullRequestStatus,
}

impl From<&PullRequest> for PullRequestShort {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pull_request_id: pr.id().clone(),
            pull_request_name: pr.title().to_string(),
            author_id: pr.author_id().clone(),
            status: pr.status(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub user_id: UserId,
    pub pull_requests: Vec<PullRequestShort>,
}

/// List the pull requests a user is reviewing
///
/// GET /users/getReview?user_id=
pub async fn get_reviews(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<ReviewsResponse>, ApiError> {
    let Query(query) = query?;
    let user_id = query
        .user_id()
        .ok_or_else(|| ApiError::bad_request("user_id is required"))?;

    let prs = state.assignments.reviews_for(&user_id).await?;

    Ok(Json(ReviewsResponse {
        user_id,
        pull_requests: prs.iter().map(PullRequestShort::from).collect(),
    }))
}
