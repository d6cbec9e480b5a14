use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::errors::ErrorKind;
use crate::domain::pull_request::PullRequestError;
use crate::domain::services::AssignmentError;

/// API error type with HTTP status code, machine-readable code and message
///
/// Rendered as `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message)
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict | ErrorKind::InvalidState => StatusCode::CONFLICT,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Transient => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn code_for(err: &AssignmentError) -> &'static str {
    match err {
        AssignmentError::PullRequestAlreadyExists(_) => "PR_EXISTS",
        AssignmentError::PullRequestAlreadyMerged(_)
        | AssignmentError::Domain(PullRequestError::AlreadyMerged) => "PR_MERGED",
        AssignmentError::UserNotReviewer { .. }
        | AssignmentError::Domain(PullRequestError::ReviewerNotAssigned(_)) => "NOT_ASSIGNED",
        AssignmentError::NoCandidate(_) => "NO_CANDIDATE",
        AssignmentError::Transient { .. } => "SERVICE_UNAVAILABLE",
        other => match other.kind() {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::InvalidState => "INVALID_STATE",
            ErrorKind::Validation => "INVALID_REQUEST",
            ErrorKind::Transient => "SERVICE_UNAVAILABLE",
            ErrorKind::Infrastructure => "INTERNAL_ERROR",
        },
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<AssignmentError> for ApiError {
    fn from(err: AssignmentError) -> Self {
        let kind = err.kind();
        if kind == ErrorKind::Infrastructure {
            tracing::error!(error = %err, "Request failed");
        }

        Self::new(status_for(kind), code_for(&err), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
