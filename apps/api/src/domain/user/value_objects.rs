use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque user identifier
///
/// Identifiers come from the upstream code host and are compared verbatim.
/// Emptiness is rejected by the entities that hold them, not here, so that
/// rows read back from storage never fail to map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new identifier
    ///
    /// # Example
    /// ```
    /// use review_assigner_api::domain::user::UserId;
    ///
    /// let id = UserId::new("u1");
    /// assert_eq!(id.as_str(), "u1");
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        UserId(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId(id.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
