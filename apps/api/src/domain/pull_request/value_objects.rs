use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::user::UserId;

/// Upper bound on the reviewer roster of a single pull request
pub const MAX_REVIEWERS: usize = 2;

/// Opaque pull request identifier, unique across the service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PullRequestId(String);

impl PullRequestId {
    pub fn new(id: impl Into<String>) -> Self {
        PullRequestId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for PullRequestId {
    fn from(id: String) -> Self {
        PullRequestId(id)
    }
}

impl From<&str> for PullRequestId {
    fn from(id: &str) -> Self {
        PullRequestId(id.to_string())
    }
}

impl fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review status of a pull request
///
/// # Status Transitions
/// ```text
/// Open -> Merged
/// ```
/// Merged is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "pr_status", rename_all = "UPPERCASE")]
pub enum PullRequestStatus {
    /// Awaiting review
    Open,
    /// Merged; reviewers are frozen
    Merged,
}

impl PullRequestStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Example
    /// ```
    /// use review_assigner_api::domain::pull_request::PullRequestStatus;
    ///
    /// assert!(PullRequestStatus::Open.can_transition_to(PullRequestStatus::Merged));
    /// assert!(!PullRequestStatus::Merged.can_transition_to(PullRequestStatus::Open));
    /// ```
    pub fn can_transition_to(&self, next: PullRequestStatus) -> bool {
        use PullRequestStatus::*;
        matches!((self, next), (Open, Merged))
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PullRequestStatus::Open => write!(f, "OPEN"),
            PullRequestStatus::Merged => write!(f, "MERGED"),
        }
    }
}

/// A reviewer slot on a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reviewer {
    pub user_id: UserId,
    pub assigned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transition_open_to_merged() {
        assert!(PullRequestStatus::Open.can_transition_to(PullRequestStatus::Merged));
    }

    #[test]
    fn merged_is_terminal() {
        assert!(!PullRequestStatus::Merged.can_transition_to(PullRequestStatus::Open));
        assert!(!PullRequestStatus::Merged.can_transition_to(PullRequestStatus::Merged));
    }

    #[test]
    fn open_to_open_is_not_a_transition() {
        assert!(!PullRequestStatus::Open.can_transition_to(PullRequestStatus::Open));
    }

    #[test]
    fn status_display() {
        assert_eq!(PullRequestStatus::Open.to_string(), "OPEN");
        assert_eq!(PullRequestStatus::Merged.to_string(), "MERGED");
    }

    #[test]
    fn status_serializes_uppercase() {
        let json = serde_json::to_string(&PullRequestStatus::Merged).unwrap();
        assert_eq!(json, "\"MERGED\"");
    }
}
