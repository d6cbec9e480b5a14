// Repository traits (ports)
// Implemented by the infrastructure layer; the domain only depends on these

pub mod pull_request_repository;
pub mod team_repository;
pub mod user_repository;

use thiserror::Error;

use crate::domain::errors::ErrorKind;

pub use pull_request_repository::PullRequestRepository;
pub use team_repository::TeamRepository;
pub use user_repository::UserRepository;

/// Failures reported by store implementations
///
/// Every call is all-or-nothing: when an error is returned nothing was
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The write lost against a concurrent one (duplicate key, row already merged)
    #[error("conflict: {0}")]
    Conflict(String),

    /// The row the write targets does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other backend failure
    #[error("database error: {0}")]
    Database(String),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::Conflict(_) => ErrorKind::Conflict,
            RepositoryError::NotFound(_) => ErrorKind::NotFound,
            RepositoryError::Database(_) => ErrorKind::Infrastructure,
        }
    }
}
