use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::user::{User, UserId};

/// Repository trait for User lookups
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
}
