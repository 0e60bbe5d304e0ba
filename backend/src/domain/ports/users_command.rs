//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, User, UserDraft, UserId};

/// Domain use-case port for creating, replacing and deleting users.
///
/// Drafts arrive unvalidated; implementations own the full validation and
/// uniqueness contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create a user from a draft and return it with its assigned id.
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error>;

    /// Replace every mutable field of an existing user.
    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<(), Error>;

    /// Delete a user.
    async fn delete_user(&self, id: UserId) -> Result<(), Error>;
}
