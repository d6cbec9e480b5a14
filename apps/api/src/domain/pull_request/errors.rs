use thiserror::Error;

use crate::domain::errors::ErrorKind;
use crate::domain::user::UserId;

/// Invariant violations raised by the pull request aggregate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PullRequestError {
    #[error("pr: no pull_request_id")]
    MissingId,

    #[error("pr: no pull_request_name")]
    MissingTitle,

    #[error("pr: no author_id")]
    MissingAuthor,

    #[error("pr: invalid initial reviewers: {0}")]
    InvalidRoster(String),

    #[error("pr: too many reviewers")]
    TooManyReviewers,

    #[error("pull request is already merged")]
    AlreadyMerged,

    #[error("pr: can't assign author {0} as reviewer")]
    AuthorIsReviewer(UserId),

    #[error("pr: user {0} is already a reviewer")]
    AlreadyAssigned(UserId),

    #[error("reviewer {0} is not assigned to this PR")]
    ReviewerNotAssigned(UserId),
}

impl PullRequestError {
    pub fn kind(&self) -> ErrorKind {
        use PullRequestError::*;
        match self {
            MissingId | MissingTitle | MissingAuthor | InvalidRoster(_) => ErrorKind::Validation,
            AlreadyMerged => ErrorKind::Conflict,
            TooManyReviewers | AuthorIsReviewer(_) | AlreadyAssigned(_) | ReviewerNotAssigned(_) => {
                ErrorKind::InvalidState
            }
        }
    }
}
