use thiserror::Error;

use super::reviewer_selection::NoCandidate;
use crate::domain::errors::ErrorKind;
use crate::domain::pull_request::{PullRequestError, PullRequestId};
use crate::domain::repositories::RepositoryError;
use crate::domain::user::UserId;

/// Errors returned by the reviewer assignment service
#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("pull request {0} already exists")]
    PullRequestAlreadyExists(PullRequestId),

    #[error("author {0} not found")]
    AuthorNotFound(UserId),

    #[error("team not found for user {0}")]
    TeamNotFound(UserId),

    #[error("pull request {0} not found")]
    PullRequestNotFound(PullRequestId),

    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error("pull request {0} already merged")]
    PullRequestAlreadyMerged(PullRequestId),

    #[error("user {user_id} is not a reviewer of pull request {pull_request_id}")]
    UserNotReviewer {
        pull_request_id: PullRequestId,
        user_id: UserId,
    },

    #[error(transparent)]
    NoCandidate(#[from] NoCandidate),

    #[error(transparent)]
    Domain(#[from] PullRequestError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The merge write failed and the pull request is still open
    #[error("merge of pull request {pull_request_id} failed: {source}")]
    Transient {
        pull_request_id: PullRequestId,
        source: RepositoryError,
    },
}

impl AssignmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssignmentError::PullRequestAlreadyExists(_)
            | AssignmentError::PullRequestAlreadyMerged(_) => ErrorKind::Conflict,
            AssignmentError::AuthorNotFound(_)
            | AssignmentError::TeamNotFound(_)
            | AssignmentError::PullRequestNotFound(_)
            | AssignmentError::UserNotFound(_) => ErrorKind::NotFound,
            AssignmentError::UserNotReviewer { .. } | AssignmentError::NoCandidate(_) => {
                ErrorKind::InvalidState
            }
            AssignmentError::Domain(err) => err.kind(),
            AssignmentError::Repository(err) => err.kind(),
            AssignmentError::Transient { .. } => ErrorKind::Transient,
        }
    }
}

/// Convenience alias for service results
pub type AssignmentResult<T> = Result<T, AssignmentError>;
