use std::fmt;
use thiserror::Error;

use crate::domain::user::UserId;

/// Classification carried by every error the domain returns
///
/// The API layer maps each kind to a transport-level response, so the kind
/// must always be recoverable from the error value through its `kind()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A pull request, author, team or user does not exist
    NotFound,
    /// The pull request already exists, or is merged and cannot change
    Conflict,
    /// The request would break a reviewer roster invariant
    InvalidState,
    /// Malformed input at construction time
    Validation,
    /// A merge write failed without a concurrent merge; the caller may retry
    Transient,
    /// Opaque store failure
    Infrastructure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::Conflict => write!(f, "conflict"),
            ErrorKind::InvalidState => write!(f, "invalid_state"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Transient => write!(f, "transient"),
            ErrorKind::Infrastructure => write!(f, "infrastructure"),
        }
    }
}

/// Errors raised while constructing or mutating users and teams
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("user: no user_id")]
    MissingUserId,

    #[error("user: no username")]
    MissingUsername,

    #[error("team: no team name")]
    MissingTeamName,

    #[error("team: user {0} already in this team")]
    MemberAlreadyPresent(UserId),
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::MemberAlreadyPresent(_) => ErrorKind::InvalidState,
            _ => ErrorKind::Validation,
        }
    }
}
