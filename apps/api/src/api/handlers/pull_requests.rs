use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::pull_request::{PullRequest, PullRequestId, PullRequestStatus};
use crate::domain::services::AssignmentError;
use crate::domain::user::UserId;

/// Request body for creating a pull request
#[derive(Debug, Deserialize)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

/// Request body for merging a pull request
#[derive(Debug, Deserialize)]
pub struct MergePullRequestRequest {
    pub pull_request_id: String,
}

/// Request body for replacing a reviewer
#[derive(Debug, Deserialize)]
pub struct ReassignReviewerRequest {
    pub pull_request_id: String,
    #[serde(alias = "old_reviewer_id")]
    pub old_user_id: String,
}

/// Full pull request representation
#[derive(Debug, Serialize)]
pub struct PullRequestResponse {
    pub pull_request_id: PullRequestId,
    pub pull_request_name: String,
    pub author_id: UserId,
    pub status: PullRequestStatus,
    pub assigned_reviewers: Vec<UserId>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "mergedAt", skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<&PullRequest> for PullRequestResponse {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pull_request_id: pr.id().clone(),
            pull_request_name: pr.title().to_string(),
            author_id: pr.author_id().clone(),
            status: pr.status(),
            assigned_reviewers: pr.reviewer_ids(),
            created_at: pr.created_at(),
            merged_at: pr.merged_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PullRequestEnvelope {
    pub pr: PullRequestResponse,
}

impl From<&PullRequest> for PullRequestEnvelope {
    fn from(pr: &PullRequest) -> Self {
        Self {
            pr: PullRequestResponse::from(pr),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReassignResponse {
    pub pr: PullRequestResponse,
    pub replaced_by: UserId,
}

/// Create a pull request and assign reviewers from the author's team
///
/// POST /pullRequest/create
pub async fn create_pull_request(
    State(state): State<AppState>,
    payload: Result<Json<CreatePullRequestRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PullRequestEnvelope>), ApiError> {
    let Json(req) = payload?;

    let pr = PullRequest::new(
        PullRequestId::from(req.pull_request_id),
        req.pull_request_name,
        UserId::from(req.author_id),
        Vec::new(),
    )
    .map_err(AssignmentError::from)?;

    let pr = state.assignments.create_and_assign(pr).await?;

    Ok((StatusCode::CREATED, Json(PullRequestEnvelope::from(&pr))))
}

/// Merge a pull request (idempotent)
///
/// POST /pullRequest/merge
pub async fn merge_pull_request(
    State(state): State<AppState>,
    payload: Result<Json<MergePullRequestRequest>, JsonRejection>,
) -> Result<Json<PullRequestEnvelope>, ApiError> {
    let Json(req) = payload?;

    let pr = state
        .assignments
        .merge(&PullRequestId::from(req.pull_request_id))
        .await?;

    Ok(Json(PullRequestEnvelope::from(&pr)))
}

/// Replace a reviewer with another active teammate of the author
///
/// POST /pullRequest/reassign
pub async fn reassign_reviewer(
    State(state): State<AppState>,
    payload: Result<Json<ReassignReviewerRequest>, JsonRejection>,
) -> Result<Json<ReassignResponse>, ApiError> {
    let Json(req) = payload?;

    let (replaced_by, pr) = state
        .assignments
        .reassign_reviewer(
            &PullRequestId::from(req.pull_request_id),
            &UserId::from(req.old_user_id),
        )
        .await?;

    Ok(Json(ReassignResponse {
        pr: PullRequestResponse::from(&pr),
        replaced_by,
    }))
}

/// Get a pull request by ID
///
/// GET /pullRequest/:id
pub async fn get_pull_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PullRequestEnvelope>, ApiError> {
    let pr = state
        .assignments
        .get_pull_request(&PullRequestId::from(id))
        .await?;

    Ok(Json(PullRequestEnvelope::from(&pr)))
}
