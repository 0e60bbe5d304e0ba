//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The unique index on email rejected the write.
        DuplicateEmail { email: String } => "email already stored: {email}",
        /// An update matched no row; it changed or vanished since it was read.
        ConcurrencyConflict { id: i32 } => "user {id} was modified concurrently",
    }
}

/// Driven port over the `users` table.
///
/// Every call completes before the caller proceeds; adapters acquire a
/// connection per call and release it on return.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every stored user, ordered by id.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the user holding `email` (exact match), skipping `excluding`.
    async fn find_by_email(
        &self,
        email: &str,
        excluding: Option<UserId>,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a user and return it with its assigned id.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Overwrite the mutable fields of an existing row.
    ///
    /// Fails with [`UserPersistenceError::ConcurrencyConflict`] when no row
    /// with the user's id remains.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Remove a row, returning whether one was deleted.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;

    /// Whether a row with `id` exists.
    async fn exists(&self, id: UserId) -> Result<bool, UserPersistenceError>;
}
