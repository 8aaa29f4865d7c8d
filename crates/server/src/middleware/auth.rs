//! Authentication extractors.
//!
//! Handlers declare the context they need and axum verifies the Bearer
//! token before the handler body runs:
//!
//! - [`AuthContext`] - any authenticated caller (tenant-bound or not)
//! - [`TenantContext`] - caller with a resolved tenant; super-admin tokens
//!   are rejected because they carry no tenant
//! - [`RequireSuperAdmin`] - platform operators only
//!
//! The tenant ID always comes from the verified token, never from
//! client-supplied data, and the resulting context is read-only.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use taskdeck_core::{Role, TenantId, UserId};

use crate::error::AppError;
use crate::services::token;
use crate::state::AppState;

/// Identity resolved from a verified access token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user.
    pub user_id: UserId,
    /// The user's tenant; `None` for super-admins.
    pub tenant_id: Option<TenantId>,
    /// The user's role at token issue time.
    pub role: Role,
}

/// Identity resolved from a verified access token, with a mandatory tenant.
///
/// Services take this for every tenant-scoped operation so that a missing
/// tenant filter is unrepresentable at the call site.
#[derive(Debug, Clone)]
pub struct TenantContext {
    /// The authenticated user.
    pub user_id: UserId,
    /// The user's tenant.
    pub tenant_id: TenantId,
    /// The user's role at token issue time.
    pub role: Role,
}

/// Extractor that only admits super-admin tokens.
#[derive(Debug, Clone)]
pub struct RequireSuperAdmin(pub AuthContext);

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing or malformed Authorization header".to_owned()))
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = token::verify(token, &state.config().jwt)?;

        Ok(Self {
            user_id: claims.user_id(),
            tenant_id: claims.tenant_id(),
            role: claims.role,
        })
    }
}

impl FromRequestParts<AppState> for TenantContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_request_parts(parts, state).await?;

        let tenant_id = ctx
            .tenant_id
            .ok_or_else(|| AppError::Forbidden("Tenant context required".to_owned()))?;

        Ok(Self {
            user_id: ctx.user_id,
            tenant_id,
            role: ctx.role,
        })
    }
}

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_request_parts(parts, state).await?;

        if !ctx.role.is_super_admin() {
            return Err(AppError::Forbidden("Super admin access required".to_owned()));
        }

        Ok(Self(ctx))
    }
}

/// Best-effort client IP, for audit entries.
///
/// Checks the proxy headers we sit behind in deployment; `None` when no
/// header is present (e.g., direct local requests).
#[derive(Debug, Clone)]
pub struct ClientIp(pub Option<String>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;

        let ip = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(|s| s.trim().to_owned())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .map(|s| s.trim().to_owned())
            })
            .or_else(|| {
                headers
                    .get("fly-client-ip")
                    .and_then(|v| v.to_str().ok())
                    .map(|s| s.trim().to_owned())
            })
            .filter(|s| !s.is_empty());

        Ok(Self(ip))
    }
}
