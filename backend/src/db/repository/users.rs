//! User repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::User;

/// Account lookup used by the authentication gate.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Account with this username, active or not.
    async fn find_user(&self, username: &str) -> RepositoryResult<Option<User>>;
}
