//! Domain ports for the hexagonal boundary.
//!
//! - Driven: [`UserRepository`], implemented by persistence adapters.
//! - Driving: [`UsersQuery`] and [`UsersCommand`], implemented by
//!   [`crate::domain::UsersService`] and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
