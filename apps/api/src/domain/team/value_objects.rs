use serde::{Deserialize, Serialize};
use std::fmt;

/// Team identifier
///
/// Teams are keyed by the integer surrogate assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(i32);

impl TeamId {
    pub fn new(id: i32) -> Self {
        TeamId(id)
    }

    /// Returns the raw integer value
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl From<i32> for TeamId {
    fn from(id: i32) -> Self {
        TeamId(id)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
