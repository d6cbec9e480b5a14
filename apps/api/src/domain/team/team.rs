use super::value_objects::TeamId;
use crate::domain::errors::ValidationError;
use crate::domain::user::UserId;

/// Team aggregate
///
/// Owns the roster of user identities that review each other's pull
/// requests. A user belongs to at most one team; that is enforced by the
/// store, which keys membership on the user row.
///
/// # Invariants
/// - Name cannot be empty
/// - Members contain no duplicates
///
/// # Example
/// ```
/// use review_assigner_api::domain::team::{Team, TeamId};
/// use review_assigner_api::domain::user::UserId;
///
/// let mut team = Team::new(TeamId::new(1), "backend").expect("valid team");
/// team.add_member(UserId::from("u1")).expect("new member");
///
/// assert_eq!(team.name(), "backend");
/// assert_eq!(team.members(), vec![UserId::from("u1")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    id: TeamId,
    name: String,
    members: Vec<UserId>,
}

impl Team {
    /// Creates an empty team
    ///
    /// # Returns
    /// * `Ok(Team)` - New team with no members
    /// * `Err(ValidationError)` - If the name is empty
    pub fn new(id: TeamId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::MissingTeamName);
        }

        Ok(Self {
            id,
            name,
            members: Vec::new(),
        })
    }

    /// Adds a member to the roster
    ///
    /// # Returns
    /// * `Err(ValidationError::MemberAlreadyPresent)` - If the user is already listed
    pub fn add_member(&mut self, user_id: UserId) -> Result<(), ValidationError> {
        if self.has_member(&user_id) {
            return Err(ValidationError::MemberAlreadyPresent(user_id));
        }

        self.members.push(user_id);
        Ok(())
    }

    /// Adds a member unless already listed
    ///
    /// Returns whether the roster changed.
    pub fn enroll(&mut self, user_id: UserId) -> bool {
        if self.has_member(&user_id) {
            return false;
        }

        self.members.push(user_id);
        true
    }

    /// Removes a member; unknown ids are ignored
    pub fn remove_member(&mut self, user_id: &UserId) {
        self.members.retain(|member| member != user_id);
    }

    pub fn has_member(&self, user_id: &UserId) -> bool {
        self.members.contains(user_id)
    }

    // ===== Getters =====

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a snapshot of the member ids
    pub fn members(&self) -> Vec<UserId> {
        self.members.clone()
    }

    /// Reconstructs a Team from persistence layer data
    ///
    /// Duplicate member ids collapse to their first occurrence.
    pub fn from_persistence(id: TeamId, name: String, members: Vec<UserId>) -> Self {
        let mut team = Self {
            id,
            name,
            members: Vec::with_capacity(members.len()),
        };
        for member in members {
            team.enroll(member);
        }
        team
    }
}
