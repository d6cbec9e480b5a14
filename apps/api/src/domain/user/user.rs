use super::value_objects::UserId;
use crate::domain::errors::ValidationError;
use crate::domain::team::TeamId;

/// A reviewer-eligible identity
///
/// Users are created and managed by the team administration flow; the
/// assignment core only reads them. A user belongs to at most one team.
///
/// # Invariants
/// - ID cannot be empty
/// - Username cannot be empty
///
/// # Example
/// ```
/// use review_assigner_api::domain::user::{User, UserId};
///
/// let user = User::new(UserId::from("u1"), "Alice", true, None).expect("valid user");
/// assert!(user.is_active());
/// assert_eq!(user.username(), "Alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: String,
    is_active: bool,
    team_id: Option<TeamId>,
}

impl User {
    /// Creates a new User
    ///
    /// # Returns
    /// * `Ok(User)` - If id and username are present
    /// * `Err(ValidationError)` - If either is empty
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        is_active: bool,
        team_id: Option<TeamId>,
    ) -> Result<Self, ValidationError> {
        let username = username.into();

        if id.is_empty() {
            return Err(ValidationError::MissingUserId);
        }
        if username.is_empty() {
            return Err(ValidationError::MissingUsername);
        }

        Ok(Self {
            id,
            username,
            is_active,
            team_id,
        })
    }

    /// Reconstructs a User from persistence layer data
    ///
    /// Only to be used by repository implementations.
    pub fn from_persistence(
        id: UserId,
        username: String,
        is_active: bool,
        team_id: Option<TeamId>,
    ) -> Self {
        Self {
            id,
            username,
            is_active,
            team_id,
        }
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }

    pub fn set_team_id(&mut self, team_id: Option<TeamId>) {
        self.team_id = team_id;
    }

    // ===== Getters =====

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether the user is eligible for reviewer assignment
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn team_id(&self) -> Option<TeamId> {
        self.team_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_with_valid_fields() {
        let user = User::new(UserId::from("u1"), "alice", true, Some(TeamId::new(3))).unwrap();

        assert_eq!(user.id().as_str(), "u1");
        assert_eq!(user.username(), "alice");
        assert!(user.is_active());
        assert_eq!(user.team_id(), Some(TeamId::new(3)));
    }

    #[test]
    fn create_user_with_empty_id_fails() {
        let result = User::new(UserId::from(""), "alice", true, None);
        assert_eq!(result.unwrap_err(), ValidationError::MissingUserId);
    }

    #[test]
    fn create_user_with_empty_username_fails() {
        let result = User::new(UserId::from("u1"), "", true, None);
        assert_eq!(result.unwrap_err(), ValidationError::MissingUsername);
    }

    #[test]
    fn toggle_active_flag() {
        let mut user = User::new(UserId::from("u1"), "alice", true, None).unwrap();

        user.set_active(false);
        assert!(!user.is_active());

        user.set_active(true);
        assert!(user.is_active());
    }

    #[test]
    fn move_user_between_teams() {
        let mut user = User::new(UserId::from("u1"), "alice", true, None).unwrap();

        user.set_team_id(Some(TeamId::new(1)));
        assert_eq!(user.team_id(), Some(TeamId::new(1)));

        user.set_team_id(None);
        assert_eq!(user.team_id(), None);
    }
}
