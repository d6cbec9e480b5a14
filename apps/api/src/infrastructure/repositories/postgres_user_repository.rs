use async_trait::async_trait;
use sqlx::PgPool;

use super::map_sqlx_error;
use crate::domain::repositories::{RepositoryError, UserRepository};
use crate::domain::team::TeamId;
use crate::domain::user::{User, UserId};

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user or overwrite the stored one with the same id
    pub async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, is_active, team_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET username = EXCLUDED.username,
                is_active = EXCLUDED.is_active,
                team_id = EXCLUDED.team_id
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.username())
        .bind(user.is_active())
        .bind(user.team_id().map(|id| id.value()))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to save user", e))?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct UserRow {
    user_id: String,
    username: String,
    is_active: bool,
    team_id: Option<i32>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_persistence(
            UserId::from(row.user_id),
            row.username,
            row.is_active,
            row.team_id.map(TeamId::new),
        )
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, username, is_active, team_id
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to find user by id", e))?;

        Ok(row.map(User::from))
    }
}
