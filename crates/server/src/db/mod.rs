//! Database operations for the Taskdeck `PostgreSQL` database.
//!
//! # Tables
//!
//! - `tenant` - Organizations with plan, status, and quota columns
//! - `app_user` - All accounts; `tenant_id` is NULL only for super-admins
//! - `project` - Projects, strictly scoped to one tenant
//! - `task` - Tasks, scoped to tenant and project
//! - `audit_log` - Append-only record of state-changing operations
//!
//! # Tenant scoping
//!
//! Every statement touching a tenant-scoped table (`app_user`, `project`,
//! `task`) carries a `tenant_id` equality predicate bound from the caller's
//! resolved context. No function in this module accepts a row ID without
//! also requiring the tenant ID.
//!
//! # Transactions
//!
//! Functions here take `&mut PgConnection` so they compose inside a single
//! transaction: callers (the service layer) open `pool.begin()`, run the
//! existence checks, the mutation, and the audit insert on the same
//! connection, then commit. A failure at any step rolls the whole unit back.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p taskdeck-cli -- migrate
//! ```

pub mod audit;
pub mod projects;
pub mod tasks;
pub mod tenants;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email or subdomain).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error to [`RepositoryError::Conflict`] when it is a unique
    /// violation, with `message` describing the duplicated value.
    pub(crate) fn from_unique_violation(e: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
