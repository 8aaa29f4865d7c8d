//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! td-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migration files live in `crates/server/migrations/` and are embedded at
//! compile time.

use super::CommandError;

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns `CommandError::MissingEnvVar` if `DATABASE_URL` is unset,
/// `CommandError::Migration` if a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
