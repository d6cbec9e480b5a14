// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_pull_request_repository;
pub mod postgres_team_repository;
pub mod postgres_user_repository;

pub use in_memory::InMemoryStore;
pub use postgres_pull_request_repository::PostgresPullRequestRepository;
pub use postgres_team_repository::PostgresTeamRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::repositories::RepositoryError;

/// Maps a sqlx failure onto the repository error vocabulary
///
/// Unique-key violations become `Conflict`; everything else is opaque.
pub(crate) fn map_sqlx_error(context: &str, err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(format!("{}: {}", context, err))
        }
        _ => RepositoryError::Database(format!("{}: {}", context, err)),
    }
}
