//! Super-admin management command.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use uuid::Uuid;

use taskdeck_core::{Email, Role};

use super::CommandError;

/// Create a platform super-admin account (no tenant).
///
/// # Errors
///
/// Returns `CommandError::InvalidInput` for a malformed email or short
/// password, `CommandError::Database` if the email is already taken.
pub async fn create(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidInput(e.to_string()))?;
    if password.len() < 8 {
        return Err(CommandError::InvalidInput(
            "password must be at least 8 characters".to_owned(),
        ));
    }
    if name.trim().is_empty() {
        return Err(CommandError::InvalidInput(
            "name cannot be empty".to_owned(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CommandError::Hashing(e.to_string()))?
        .to_string();

    let pool = super::connect().await?;

    sqlx::query(
        "INSERT INTO app_user (id, tenant_id, email, password_hash, full_name, role) \
         VALUES ($1, NULL, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(&password_hash)
    .bind(name.trim())
    .bind(Role::SuperAdmin)
    .execute(&pool)
    .await?;

    tracing::info!(email = %email, "super-admin created");
    Ok(())
}
