//! User data model.
//!
//! A submission moves through three shapes:
//! - [`UserDraft`]: raw fields as received, every field optional.
//! - [`UserSubmission`]: fields that passed validation, strings untrimmed.
//! - [`UserProfile`]: trimmed values written to storage.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod nationality;
pub mod validation;

pub use nationality::{Nationality, UnknownNationality};
use validation::{ValidationErrors, fields};

/// Storage-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User fields exactly as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub nationality: Option<String>,
    pub total_score: Option<f64>,
}

impl UserDraft {
    /// Run every field validator and collect the violations.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::UserDraft;
    ///
    /// let draft = UserDraft {
    ///     first_name: Some("Ada".into()),
    ///     last_name: Some("Lovelace".into()),
    ///     email: Some("ada@example.com".into()),
    ///     nationality: Some("GB".into()),
    ///     total_score: Some(42.0),
    /// };
    /// assert!(draft.validate().is_ok());
    /// ```
    pub fn validate(self) -> Result<UserSubmission, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check(
            fields::FIRST_NAME,
            validation::validate_first_name(self.first_name.as_deref()),
        );
        errors.check(
            fields::LAST_NAME,
            validation::validate_last_name(self.last_name.as_deref()),
        );
        errors.check(
            fields::EMAIL,
            validation::validate_email(self.email.as_deref()),
        );
        let nationality = errors.check(
            fields::NATIONALITY,
            validation::validate_nationality(self.nationality.as_deref()),
        );
        let total_score = errors.check(
            fields::TOTAL_SCORE,
            validation::validate_total_score(self.total_score),
        );

        match (
            self.first_name,
            self.last_name,
            self.email,
            nationality,
            total_score,
        ) {
            (Some(first_name), Some(last_name), Some(email), Some(nationality), Some(total_score))
                if errors.is_empty() =>
            {
                Ok(UserSubmission {
                    first_name,
                    last_name,
                    email,
                    nationality,
                    total_score,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Submitted fields that passed validation; strings are still untrimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSubmission {
    first_name: String,
    last_name: String,
    email: String,
    nationality: Nationality,
    total_score: f64,
}

impl UserSubmission {
    /// True when any of the string fields is empty or whitespace only.
    #[must_use]
    pub fn has_blank_field(&self) -> bool {
        [&self.first_name, &self.last_name, &self.email]
            .iter()
            .any(|value| value.trim().is_empty())
    }

    /// Email exactly as submitted, before trimming.
    #[must_use]
    pub fn raw_email(&self) -> &str {
        self.email.as_str()
    }

    /// Trim the string fields, producing the values to persist.
    #[must_use]
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            nationality: self.nationality,
            total_score: self.total_score,
        }
    }
}

/// Mutable user fields as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub nationality: Nationality,
    pub total_score: f64,
}

/// A user about to be inserted; storage assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
}

/// Persisted user.
///
/// ## Invariants
/// - `id` and `created_at` never change after creation.
/// - `profile` strings are trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    profile: UserProfile,
    created_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from stored components.
    #[must_use]
    pub fn new(id: UserId, profile: UserProfile, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            profile,
            created_at,
        }
    }

    /// Storage-assigned identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Current mutable fields.
    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Overwrite every mutable field; id and creation time are kept.
    pub fn replace_profile(&mut self, profile: UserProfile) {
        self.profile = profile;
    }
}

#[cfg(test)]
mod tests;
