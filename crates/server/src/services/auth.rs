//! Identity and session issuance: tenant registration, login, profile, logout.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use taskdeck_core::{
    AuditAction, Email, Role, Subdomain, SubscriptionPlan, TenantId, TenantStatus, UserId,
};

use crate::config::ServerConfig;
use crate::db::{audit, tenants, users};
use crate::error::{AppError, FieldError};
use crate::models::tenant::TenantSummary;
use crate::models::{NewAuditLog, User};
use crate::services::password::{hash_password, password_policy_violation, verify_password};
use crate::services::token;

/// Authentication failures.
///
/// Client-facing messages come from [`AuthError::client_message`]; the
/// `Display` form may carry internal detail and is only logged.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user, inactive account, or password mismatch.
    /// Deliberately indistinguishable to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The tenant does not exist or is suspended.
    /// Deliberately indistinguishable to the caller.
    #[error("tenant not accessible")]
    TenantNotAccessible,

    /// The access token has lapsed.
    #[error("token expired")]
    TokenExpired,

    /// The access token failed verification.
    #[error("invalid token: {0}")]
    TokenInvalid(String),

    /// A cryptographic primitive failed (hashing, signing).
    #[error("crypto error: {0}")]
    Crypto(String),
}

impl AuthError {
    /// The message exposed to HTTP clients.
    #[must_use]
    pub const fn client_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid credentials",
            Self::TenantNotAccessible => "Tenant not accessible",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid(_) => "Invalid token",
            Self::Crypto(_) => "Server error",
        }
    }
}

// =============================================================================
// Request / response DTOs
// =============================================================================

/// Body of `POST /auth/register-tenant`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTenantRequest {
    pub tenant_name: String,
    pub subdomain: String,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_full_name: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Absent for super-admin login.
    #[serde(default)]
    pub tenant_subdomain: Option<String>,
}

/// Payload of a successful tenant registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTenantResponse {
    pub tenant_id: TenantId,
    pub subdomain: Subdomain,
    pub admin_user: User,
}

/// Payload of a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// Payload of `GET /auth/me`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: UserId,
    pub email: Email,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub tenant: Option<TenantSummary>,
}

// =============================================================================
// Service
// =============================================================================

/// Authentication service.
///
/// Owns credential verification, token issuance, and the audit entries that
/// accompany identity events.
pub struct AuthService<'a> {
    pool: &'a PgPool,
    config: &'a ServerConfig,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, config: &'a ServerConfig) -> Self {
        Self { pool, config }
    }

    /// Register a new tenant with its first admin account.
    ///
    /// Runs as a single transaction: tenant row (active, free-plan quotas),
    /// admin user, and the REGISTER_TENANT audit entry commit together.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` on malformed fields,
    /// `AppError::Conflict` on a duplicate subdomain or email, and
    /// `AppError::Database` on storage failures.
    pub async fn register_tenant(
        &self,
        ip: Option<String>,
        req: RegisterTenantRequest,
    ) -> Result<RegisterTenantResponse, AppError> {
        let mut errors = Vec::new();

        if req.tenant_name.trim().is_empty() {
            errors.push(FieldError::new(
                "tenantName",
                "tenant name cannot be empty".to_owned(),
            ));
        }
        let subdomain = match Subdomain::parse(&req.subdomain) {
            Ok(s) => Some(s),
            Err(e) => {
                errors.push(FieldError::new("subdomain", e.to_string()));
                None
            }
        };
        let email = match Email::parse(&req.admin_email) {
            Ok(e) => Some(e),
            Err(e) => {
                errors.push(FieldError::new("adminEmail", e.to_string()));
                None
            }
        };
        if let Some(violation) = password_policy_violation(&req.admin_password) {
            errors.push(FieldError::new("adminPassword", violation));
        }
        if req.admin_full_name.trim().is_empty() {
            errors.push(FieldError::new(
                "adminFullName",
                "full name cannot be empty".to_owned(),
            ));
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        // Both are Some when no field error was recorded.
        let (Some(subdomain), Some(email)) = (subdomain, email) else {
            return Err(AppError::Internal("validation state mismatch".to_owned()));
        };

        let password_hash = hash_password(&req.admin_password)?;

        let mut tx = self.pool.begin().await?;

        if tenants::get_by_subdomain(&mut tx, &subdomain).await?.is_some() {
            return Err(AppError::Conflict("Subdomain already exists".to_owned()));
        }
        if users::email_exists_anywhere(&mut tx, &email).await? {
            return Err(AppError::Conflict("Email already exists".to_owned()));
        }

        let plan = SubscriptionPlan::Free;
        let tenant = tenants::insert(
            &mut tx,
            TenantId::generate(),
            req.tenant_name.trim(),
            &subdomain,
            plan,
            plan.limits(),
        )
        .await?;

        let admin_user = users::insert(
            &mut tx,
            users::NewUser {
                id: UserId::generate(),
                tenant_id: Some(tenant.id),
                email: &email,
                password_hash: &password_hash,
                full_name: req.admin_full_name.trim(),
                role: Role::TenantAdmin,
            },
        )
        .await?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(tenant.id),
                admin_user.id,
                AuditAction::RegisterTenant,
                tenant.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(tenant_id = %tenant.id, subdomain = %tenant.subdomain, "tenant registered");

        Ok(RegisterTenantResponse {
            tenant_id: tenant.id,
            subdomain: tenant.subdomain,
            admin_user,
        })
    }

    /// Verify credentials and issue an access token.
    ///
    /// Without `tenantSubdomain` only super-admin accounts match; with it,
    /// the tenant must exist and be active before the user is even looked
    /// up. Successful logins append a LOGIN / LOGIN_SUPER_ADMIN audit entry.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` (401) on any user-side
    /// mismatch and `AuthError::TenantNotAccessible` (403) when the tenant
    /// is missing or suspended.
    pub async fn login(
        &self,
        ip: Option<String>,
        req: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let email = Email::parse(&req.email).map_err(|e| {
            AppError::Validation(vec![FieldError::new("email", e.to_string())])
        })?;

        match req.tenant_subdomain.as_deref().filter(|s| !s.is_empty()) {
            None => self.login_super_admin(ip, &email, &req.password).await,
            Some(subdomain) => {
                self.login_tenant_user(ip, subdomain, &email, &req.password)
                    .await
            }
        }
    }

    async fn login_super_admin(
        &self,
        ip: Option<String>,
        email: &Email,
        password: &str,
    ) -> Result<LoginResponse, AppError> {
        let mut conn = self.pool.acquire().await?;

        let found = users::find_super_admin_by_email(&mut conn, email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !found.user.is_active {
            return Err(AuthError::InvalidCredentials.into());
        }

        verify_password(password, &found.password_hash)?;

        let user = found.user;
        let token = token::issue(user.id, None, user.role, &self.config.jwt)?;

        audit::append(
            &mut conn,
            &NewAuditLog::new(
                None,
                user.id,
                AuditAction::LoginSuperAdmin,
                user.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        Ok(LoginResponse { user, token })
    }

    async fn login_tenant_user(
        &self,
        ip: Option<String>,
        subdomain: &str,
        email: &Email,
        password: &str,
    ) -> Result<LoginResponse, AppError> {
        let subdomain =
            Subdomain::parse(subdomain).map_err(|_| AuthError::TenantNotAccessible)?;

        let mut conn = self.pool.acquire().await?;

        let tenant = tenants::get_by_subdomain(&mut conn, &subdomain)
            .await?
            .ok_or(AuthError::TenantNotAccessible)?;
        if tenant.status != TenantStatus::Active {
            return Err(AuthError::TenantNotAccessible.into());
        }

        let found = users::find_by_email_in_tenant(&mut conn, tenant.id, email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !found.user.is_active {
            return Err(AuthError::InvalidCredentials.into());
        }

        verify_password(password, &found.password_hash)?;

        let user = found.user;
        let token = token::issue(user.id, Some(tenant.id), user.role, &self.config.jwt)?;

        audit::append(
            &mut conn,
            &NewAuditLog::new(
                Some(tenant.id),
                user.id,
                AuditAction::Login,
                user.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        Ok(LoginResponse { user, token })
    }

    /// Fetch the caller's profile, with a tenant summary when applicable.
    ///
    /// Pure read; `user_id` comes from a verified token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the account no longer exists.
    pub async fn me(&self, user_id: UserId) -> Result<MeResponse, AppError> {
        let mut conn = self.pool.acquire().await?;

        let user = users::get_by_id(&mut conn, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

        let tenant = match user.tenant_id {
            Some(tenant_id) => Some(TenantSummary::from(
                tenants::get_by_id(&mut conn, tenant_id).await?,
            )),
            None => None,
        };

        Ok(MeResponse {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
            tenant,
        })
    }

    /// Record a LOGOUT audit entry.
    ///
    /// Best-effort: token invalidation is stateless (tokens lapse at
    /// expiry), so a failed audit write is logged and swallowed rather than
    /// failing the request.
    pub async fn logout(
        &self,
        user_id: UserId,
        tenant_id: Option<TenantId>,
        ip: Option<String>,
    ) {
        let entry = NewAuditLog::new(
            tenant_id,
            user_id,
            AuditAction::Logout,
            user_id.as_uuid(),
            ip,
        );

        let result = match self.pool.acquire().await {
            Ok(mut conn) => audit::append(&mut conn, &entry).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            tracing::warn!(user_id = %user_id, error = %e, "logout audit write failed");
        }
    }
}
