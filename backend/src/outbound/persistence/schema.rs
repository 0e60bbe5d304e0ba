//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users.
    ///
    /// `email` carries the `users_email_key` unique constraint.
    users (id) {
        /// Serial primary key.
        id -> Int4,
        /// Trimmed first name (max 50 characters).
        first_name -> Varchar,
        /// Trimmed last name (max 50 characters).
        last_name -> Varchar,
        /// Trimmed email address (max 100 characters).
        email -> Varchar,
        /// ISO 3166-1 alpha-2 country code.
        nationality -> Varchar,
        /// Non-negative score.
        total_score -> Float8,
        /// Creation timestamp, written by the service.
        created_at -> Timestamptz,
    }
}
