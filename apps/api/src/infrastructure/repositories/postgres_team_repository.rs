use async_trait::async_trait;
use sqlx::PgPool;

use super::map_sqlx_error;
use super::postgres_user_repository::UserRow;
use crate::domain::repositories::{RepositoryError, TeamRepository};
use crate::domain::team::{Team, TeamId};
use crate::domain::user::{User, UserId};

/// PostgreSQL implementation of TeamRepository
///
/// Team membership is the `team_id` column on `users`; a team's roster is
/// read back ordered by user id.
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Creates a new PostgresTeamRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a team and return it with its generated id
    ///
    /// Team names are unique; a taken name is a `RepositoryError::Conflict`.
    pub async fn create(&self, name: &str) -> Result<Team, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO teams (team_name)
            VALUES ($1)
            RETURNING id
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to create team", e))?;

        Ok(Team::from_persistence(TeamId::new(id), name.to_string(), Vec::new()))
    }

    async fn members_of(&self, team_id: TeamId) -> Result<Vec<UserId>, RepositoryError> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT user_id FROM users
            WHERE team_id = $1
            ORDER BY user_id
            "#,
        )
        .bind(team_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to load team members", e))?;

        Ok(ids.into_iter().map(UserId::from).collect())
    }
}

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: i32,
    team_name: String,
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<Team>, RepositoryError> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT t.id, t.team_name
            FROM teams t
            JOIN users u ON u.team_id = t.id
            WHERE u.user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to find team by user id", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let team_id = TeamId::new(row.id);
        let members = self.members_of(team_id).await?;
        Ok(Some(Team::from_persistence(team_id, row.team_name, members)))
    }

    async fn find_active_members_by_team_id(
        &self,
        team_id: TeamId,
    ) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, username, is_active, team_id
            FROM users
            WHERE team_id = $1 AND is_active
            ORDER BY user_id
            "#,
        )
        .bind(team_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to find active team members", e))?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
