//! Driving port for user reads.
//!
//! Inbound adapters use this port to fetch users without importing outbound
//! persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every user; an empty list when none exist.
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    /// One user, or a `not_found` error.
    async fn get_user(&self, id: UserId) -> Result<User, Error>;
}
