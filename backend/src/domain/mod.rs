//! Domain primitives, ports and services.
//!
//! Purpose: define the user record, its validation rules and the use-case
//! service behind the HTTP adapter. Types here know nothing about Actix or
//! Diesel; adapters reach the domain only through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - User (alias to `user::User`) — persisted user record.
//! - UsersService — implementation of the users driving ports.

pub mod error;
pub mod ports;
mod trace_id;
pub mod user;
mod users_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::validation;
pub use self::user::{
    Nationality, NewUser, UnknownNationality, User, UserDraft, UserId, UserProfile,
    UserSubmission,
};
pub use self::users_service::{
    BLANK_FIELDS_MESSAGE, DUPLICATE_EMAIL_MESSAGE, UsersService, VALIDATION_FAILED_MESSAGE,
};
