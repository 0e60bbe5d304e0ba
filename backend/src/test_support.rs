//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or when the
//! `test-support` feature is enabled.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId};

/// Timestamp reported by [`fixture_clock`].
///
/// # Panics
/// Never in practice; the literal date is valid.
#[must_use]
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
        .single()
        .unwrap_or_else(|| panic!("fixture timestamp is unambiguous"))
}

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// Freeze the clock at `utc_now`.
    #[must_use]
    pub fn at(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// Clock frozen at [`fixture_timestamp`].
#[must_use]
pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock::at(fixture_timestamp()))
}

#[derive(Debug)]
struct InMemoryState {
    rows: BTreeMap<i32, User>,
    next_id: i32,
    unavailable: bool,
}

impl Default for InMemoryState {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
            unavailable: false,
        }
    }
}

impl InMemoryState {
    fn email_taken(&self, email: &str, excluding: Option<UserId>) -> bool {
        self.rows
            .values()
            .any(|user| Some(user.id()) != excluding && user.profile().email == email)
    }
}

/// [`UserRepository`] backed by a map, mirroring the `users` table rules.
///
/// Ids are assigned sequentially from 1. The email uniqueness rule and the
/// zero-row update conflict behave as the Postgres adapter does.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<InMemoryState>,
}

impl InMemoryUserRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Remove a row behind the service's back, as a concurrent client would.
    pub fn remove_row(&self, id: UserId) -> Option<User> {
        self.lock().rows.remove(&id.get())
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    /// True when no rows are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, InMemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn available(&self) -> Result<MutexGuard<'_, InMemoryState>, UserPersistenceError> {
        let state = self.lock();
        if state.unavailable {
            return Err(UserPersistenceError::connection("in-memory store offline"));
        }
        Ok(state)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.available()?;
        Ok(state.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.available()?;
        Ok(state.rows.get(&id.get()).cloned())
    }

    async fn find_by_email(
        &self,
        email: &str,
        excluding: Option<UserId>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.available()?;
        Ok(state
            .rows
            .values()
            .find(|user| Some(user.id()) != excluding && user.profile().email == email)
            .cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.available()?;
        if state.email_taken(&user.profile.email, None) {
            return Err(UserPersistenceError::duplicate_email(
                user.profile.email.clone(),
            ));
        }
        let id = state.next_id;
        state.next_id += 1;
        let stored = User::new(UserId::new(id), user.profile.clone(), user.created_at);
        state.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.available()?;
        if state.email_taken(&user.profile().email, Some(user.id())) {
            return Err(UserPersistenceError::duplicate_email(
                user.profile().email.clone(),
            ));
        }
        let Some(row) = state.rows.get_mut(&user.id().get()) else {
            return Err(UserPersistenceError::concurrency_conflict(user.id().get()));
        };
        row.replace_profile(user.profile().clone());
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut state = self.available()?;
        Ok(state.rows.remove(&id.get()).is_some())
    }

    async fn exists(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let state = self.available()?;
        Ok(state.rows.contains_key(&id.get()))
    }
}
