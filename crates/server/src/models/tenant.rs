//! Tenant domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taskdeck_core::{Subdomain, SubscriptionPlan, TenantId, TenantStatus};

/// A tenant: an isolated organization-level data partition.
///
/// Tenants are never hard-deleted; suspension (by a super-admin) blocks all
/// logins while keeping the data.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    /// Unique tenant ID.
    pub id: TenantId,
    /// Display name, editable by the tenant's admins.
    pub name: String,
    /// Globally unique login subdomain.
    pub subdomain: Subdomain,
    /// Lifecycle status.
    pub status: TenantStatus,
    /// Current subscription plan.
    pub subscription_plan: SubscriptionPlan,
    /// Plan-derived user quota, denormalized for cheap checks.
    pub max_users: i32,
    /// Plan-derived project quota, denormalized for cheap checks.
    pub max_projects: i32,
    /// When the tenant registered.
    pub created_at: DateTime<Utc>,
    /// When the tenant was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Compact tenant view embedded in `GET /auth/me` responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSummary {
    pub id: TenantId,
    pub name: String,
    pub subdomain: Subdomain,
    pub subscription_plan: SubscriptionPlan,
    pub max_users: i32,
    pub max_projects: i32,
}

impl From<Tenant> for TenantSummary {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name,
            subdomain: tenant.subdomain,
            subscription_plan: tenant.subscription_plan,
            max_users: tenant.max_users,
            max_projects: tenant.max_projects,
        }
    }
}
