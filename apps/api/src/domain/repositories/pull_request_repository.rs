use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::pull_request::{PullRequest, PullRequestId};
use crate::domain::user::UserId;

/// Repository trait for the PullRequest aggregate
///
/// Implementations persist the aggregate together with its ordered reviewer
/// roster in a single atomic write.
#[async_trait]
pub trait PullRequestRepository: Send + Sync {
    /// Insert a new pull request and its reviewers
    ///
    /// Fails with `RepositoryError::Conflict` if the id is taken.
    async fn create(&self, pr: &PullRequest) -> Result<(), RepositoryError>;

    /// Find a pull request by its ID
    async fn find_by_id(&self, id: &PullRequestId) -> Result<Option<PullRequest>, RepositoryError>;

    /// Replace status, merged_at and the full reviewer roster
    ///
    /// Fails with `RepositoryError::Conflict` if the stored row is already
    /// merged, and `RepositoryError::NotFound` if it does not exist.
    async fn update(&self, pr: &PullRequest) -> Result<(), RepositoryError>;

    /// Find every pull request
    async fn find_all(&self) -> Result<Vec<PullRequest>, RepositoryError>;

    /// Find all pull requests a user is currently reviewing
    async fn find_by_reviewer(&self, user_id: &UserId) -> Result<Vec<PullRequest>, RepositoryError>;
}
