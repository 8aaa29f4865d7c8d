//! Password hashing and verification using Argon2id.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::services::auth::AuthError;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password with Argon2id and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::Crypto` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Crypto(format!("password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored PHC-format hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch, or
/// `AuthError::Crypto` if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid stored hash: {e}")))?;

    let argon2 = Argon2::default();
    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(()),
        Err(argon2::password_hash::Error::Password) => Err(AuthError::InvalidCredentials),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}

/// Check a candidate password against the policy.
///
/// Returns a human-readable violation for the field-error path, or `None`
/// if the password is acceptable.
#[must_use]
pub fn password_policy_violation(password: &str) -> Option<String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Some(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_password_matches() {
        let hash = hash_password("hunter2!").unwrap();
        assert!(verify_password("hunter2!", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_does_not_match() {
        let hash = hash_password("hunter2!").unwrap();
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let h1 = hash_password("hunter2!").unwrap();
        let h2 = hash_password("hunter2!").unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_malformed_hash_is_crypto_error() {
        assert!(matches!(
            verify_password("pw", "not-a-hash"),
            Err(AuthError::Crypto(_))
        ));
    }

    #[test]
    fn test_policy() {
        assert!(password_policy_violation("short").is_some());
        assert!(password_policy_violation("long-enough").is_none());
    }
}
