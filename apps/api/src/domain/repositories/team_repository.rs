use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::team::{Team, TeamId};
use crate::domain::user::{User, UserId};

/// Repository trait for Team aggregate
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Find the team a user belongs to
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<Team>, RepositoryError>;

    /// Find the active members of a team
    async fn find_active_members_by_team_id(
        &self,
        team_id: TeamId,
    ) -> Result<Vec<User>, RepositoryError>;
}
