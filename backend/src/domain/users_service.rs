//! Users domain service.
//!
//! Implements the driving ports over a [`UserRepository`], enforcing field
//! validation, email uniqueness and the update race handling. Each operation
//! issues its repository calls strictly one after another.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{Error, NewUser, User, UserDraft, UserId, UserSubmission};

/// Message attached to field validation failures.
pub const VALIDATION_FAILED_MESSAGE: &str = "One or more validation errors occurred.";
/// Message returned when a string field is blank.
pub const BLANK_FIELDS_MESSAGE: &str = "Fields cannot be empty or contain only whitespace.";
/// Message returned when the email is already held by another user.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "A user with this email already exists.";

/// Users service implementing [`UsersQuery`] and [`UsersCommand`].
#[derive(Clone)]
pub struct UsersService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> UsersService<R> {
    /// Create a service over `repository`, stamping creation times from `clock`.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict(DUPLICATE_EMAIL_MESSAGE),
        UserPersistenceError::ConcurrencyConflict { id } => {
            Error::internal(format!("user {id} was modified concurrently"))
        }
    }
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// Field validation followed by the blank string check.
fn validate_draft(draft: UserDraft) -> Result<UserSubmission, Error> {
    let submission = draft.validate().map_err(|errors| {
        Error::invalid_request(VALIDATION_FAILED_MESSAGE).with_details(errors.to_details())
    })?;
    if submission.has_blank_field() {
        return Err(Error::invalid_request(BLANK_FIELDS_MESSAGE));
    }
    Ok(submission)
}

impl<R> UsersService<R>
where
    R: UserRepository,
{
    async fn ensure_email_free(&self, raw_email: &str, excluding: Option<UserId>) -> Result<(), Error> {
        let holder = self
            .repository
            .find_by_email(raw_email, excluding)
            .await
            .map_err(map_persistence_error)?;
        match holder {
            Some(_) => Err(Error::conflict(DUPLICATE_EMAIL_MESSAGE)),
            None => Ok(()),
        }
    }

    async fn load(&self, id: UserId) -> Result<User, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| user_not_found(id))
    }

    /// Resolve an update that matched no row.
    async fn resolve_update_conflict(&self, id: UserId, conflict: UserPersistenceError) -> Error {
        match self.repository.exists(id).await {
            Ok(false) => user_not_found(id),
            Ok(true) => {
                error!(user_id = %id, error = %conflict, "update conflicted with a live row");
                map_persistence_error(conflict)
            }
            Err(err) => map_persistence_error(err),
        }
    }
}

#[async_trait]
impl<R> UsersQuery for UsersService<R>
where
    R: UserRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repository.list().await.map_err(map_persistence_error)
    }

    async fn get_user(&self, id: UserId) -> Result<User, Error> {
        self.load(id).await
    }
}

#[async_trait]
impl<R> UsersCommand for UsersService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        let submission = validate_draft(draft)?;
        // The pre-check runs on the email as submitted; storage holds it trimmed.
        self.ensure_email_free(submission.raw_email(), None).await?;

        let new_user = NewUser {
            profile: submission.into_profile(),
            created_at: self.clock.utc(),
        };
        let user = self
            .repository
            .insert(&new_user)
            .await
            .map_err(map_persistence_error)?;
        info!(user_id = %user.id(), "user created");
        Ok(user)
    }

    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<(), Error> {
        let submission = validate_draft(draft)?;
        let mut user = self.load(id).await?;
        self.ensure_email_free(submission.raw_email(), Some(id)).await?;

        user.replace_profile(submission.into_profile());
        match self.repository.update(&user).await {
            Ok(()) => {
                info!(user_id = %id, "user updated");
                Ok(())
            }
            Err(conflict @ UserPersistenceError::ConcurrencyConflict { .. }) => {
                Err(self.resolve_update_conflict(id, conflict).await)
            }
            Err(err) => Err(map_persistence_error(err)),
        }
    }

    async fn delete_user(&self, id: UserId) -> Result<(), Error> {
        let user = self.load(id).await?;
        let deleted = self
            .repository
            .delete(user.id())
            .await
            .map_err(map_persistence_error)?;
        if !deleted {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
