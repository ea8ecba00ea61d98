use async_trait::async_trait;

use super::domain::{NewUser, StoredUser, User};
use crate::storage::RepositoryError;

/// Persistence operations for registered users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user; an already registered email is a `Conflict`.
    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, RepositoryError>;
}
