//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taskdeck_core::{Email, Role, TenantId, UserId};

/// A user account (domain type, no credentials).
///
/// `tenant_id` is `None` only for platform super-admins; every other account
/// belongs to exactly one tenant.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Email address, unique within the tenant (globally for super-admins).
    pub email: Email,
    /// Display name.
    pub full_name: String,
    /// Authorization role.
    pub role: Role,
    /// Owning tenant, absent for super-admins.
    pub tenant_id: Option<TenantId>,
    /// Deactivated accounts cannot log in or be assigned tasks.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A user row joined with its stored password hash, for credential checks.
///
/// Only the auth service sees this type; it never serializes.
#[derive(Debug, sqlx::FromRow)]
pub struct UserWithPassword {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}
