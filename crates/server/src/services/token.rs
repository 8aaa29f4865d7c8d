//! JWT access token issuance and verification.
//!
//! Tokens are stateless HS256 JWTs embedding the caller's identity and
//! resolved tenant. Verification is purely local; logout does not revoke
//! tokens (they lapse at expiry).

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskdeck_core::{Role, TenantId, UserId};

use crate::config::JwtConfig;
use crate::services::auth::AuthError;

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID.
    pub sub: Uuid,
    /// Resolved tenant; `None` for super-admin tokens.
    pub tenant_id: Option<Uuid>,
    /// The user's role at issue time.
    pub role: Role,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID.
    pub jti: Uuid,
}

impl Claims {
    /// The subject as a typed user ID.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::new(self.sub)
    }

    /// The resolved tenant as a typed ID.
    #[must_use]
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id.map(TenantId::new)
    }
}

/// Issue a signed access token for the given identity.
///
/// # Errors
///
/// Returns `AuthError::Crypto` if signing fails.
pub fn issue(
    user_id: UserId,
    tenant_id: Option<TenantId>,
    role: Role,
    config: &JwtConfig,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.as_uuid(),
        tenant_id: tenant_id.map(|t| t.as_uuid()),
        role,
        iat: now,
        exp: now + config.lifetime_secs,
        jti: Uuid::new_v4(),
    };

    let key = EncodingKey::from_secret(config.secret.expose_secret().as_bytes());
    jsonwebtoken::encode(&Header::default(), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify an access token (signature and expiry).
///
/// # Errors
///
/// Returns `AuthError::TokenExpired` if the token has lapsed, or
/// `AuthError::TokenInvalid` for any other verification failure.
pub fn verify(token: &str, config: &JwtConfig) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: SecretString::from("Kq9mW2xRv7Lp4Zt8Nb3Jc6Hd1Fg5Ys0A"),
            lifetime_secs: 900,
        }
    }

    #[test]
    fn test_roundtrip() {
        let config = test_config();
        let user_id = UserId::generate();
        let tenant_id = TenantId::generate();

        let token = issue(user_id, Some(tenant_id), Role::TenantAdmin, &config).unwrap();
        let claims = verify(&token, &config).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.tenant_id(), Some(tenant_id));
        assert_eq!(claims.role, Role::TenantAdmin);
    }

    #[test]
    fn test_super_admin_token_has_no_tenant() {
        let config = test_config();
        let token = issue(UserId::generate(), None, Role::SuperAdmin, &config).unwrap();
        let claims = verify(&token, &config).unwrap();

        assert_eq!(claims.tenant_id(), None);
        assert_eq!(claims.role, Role::SuperAdmin);
    }

    #[test]
    fn test_jti_is_unique() {
        let config = test_config();
        let user_id = UserId::generate();

        let t1 = issue(user_id, None, Role::SuperAdmin, &config).unwrap();
        let t2 = issue(user_id, None, Role::SuperAdmin, &config).unwrap();

        let c1 = verify(&t1, &config).unwrap();
        let c2 = verify(&t2, &config).unwrap();
        assert_ne!(c1.jti, c2.jti);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = JwtConfig {
            lifetime_secs: -120,
            ..test_config()
        };
        let token = issue(UserId::generate(), None, Role::User, &config).unwrap();

        assert!(matches!(
            verify(&token, &config),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let config = test_config();
        let token = issue(UserId::generate(), None, Role::User, &config).unwrap();

        let other = JwtConfig {
            secret: SecretString::from("Zx4Tq7Wn2Vb9Mk5Rc8Hd3Jf6Lp1Gs0Ye"),
            lifetime_secs: 900,
        };
        assert!(matches!(
            verify(&token, &other),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let config = test_config();
        assert!(matches!(
            verify("not-a-jwt", &config),
            Err(AuthError::TokenInvalid(_))
        ));
    }
}
