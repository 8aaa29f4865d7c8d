//! Tenant repository.
//!
//! Tenants are the only table without a `tenant_id` filter; platform-wide
//! reads here are reserved for super-admin flows and the login path.

use sqlx::PgConnection;

use taskdeck_core::{
    PlanLimits, Subdomain, SubscriptionPlan, TenantId, TenantStatus,
};

use super::RepositoryError;
use crate::models::Tenant;

const TENANT_COLUMNS: &str = "id, name, subdomain, status, subscription_plan, \
                              max_users, max_projects, created_at, updated_at";

/// Get a tenant by ID.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no tenant has this ID.
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_id(conn: &mut PgConnection, id: TenantId) -> Result<Tenant, RepositoryError> {
    let query = format!("SELECT {TENANT_COLUMNS} FROM tenant WHERE id = $1");

    sqlx::query_as::<_, Tenant>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)
}

/// Look up a tenant by its login subdomain.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_subdomain(
    conn: &mut PgConnection,
    subdomain: &Subdomain,
) -> Result<Option<Tenant>, RepositoryError> {
    let query = format!("SELECT {TENANT_COLUMNS} FROM tenant WHERE subdomain = $1");

    Ok(sqlx::query_as::<_, Tenant>(&query)
        .bind(subdomain)
        .fetch_optional(conn)
        .await?)
}

/// List all tenants, newest first. Super-admin only at the service layer.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_all(conn: &mut PgConnection) -> Result<Vec<Tenant>, RepositoryError> {
    let query = format!("SELECT {TENANT_COLUMNS} FROM tenant ORDER BY created_at DESC");

    Ok(sqlx::query_as::<_, Tenant>(&query).fetch_all(conn).await?)
}

/// Insert a new tenant with the given plan and its quota row.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the subdomain is already taken.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert(
    conn: &mut PgConnection,
    id: TenantId,
    name: &str,
    subdomain: &Subdomain,
    plan: SubscriptionPlan,
    limits: PlanLimits,
) -> Result<Tenant, RepositoryError> {
    let query = format!(
        "INSERT INTO tenant (id, name, subdomain, status, subscription_plan, max_users, max_projects) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {TENANT_COLUMNS}"
    );

    sqlx::query_as::<_, Tenant>(&query)
        .bind(id)
        .bind(name)
        .bind(subdomain)
        .bind(TenantStatus::Active)
        .bind(plan)
        .bind(limits.max_users)
        .bind(limits.max_projects)
        .fetch_one(conn)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "Subdomain already exists"))
}

/// Rename a tenant.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the tenant doesn't exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update_name(
    conn: &mut PgConnection,
    id: TenantId,
    name: &str,
) -> Result<Tenant, RepositoryError> {
    let query = format!(
        "UPDATE tenant SET name = $1, updated_at = now() \
         WHERE id = $2 \
         RETURNING {TENANT_COLUMNS}"
    );

    sqlx::query_as::<_, Tenant>(&query)
        .bind(name)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)
}

/// Change a tenant's subscription plan, rewriting both quota columns.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the tenant doesn't exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update_plan(
    conn: &mut PgConnection,
    id: TenantId,
    plan: SubscriptionPlan,
    limits: PlanLimits,
) -> Result<Tenant, RepositoryError> {
    let query = format!(
        "UPDATE tenant \
         SET subscription_plan = $1, max_users = $2, max_projects = $3, updated_at = now() \
         WHERE id = $4 \
         RETURNING {TENANT_COLUMNS}"
    );

    sqlx::query_as::<_, Tenant>(&query)
        .bind(plan)
        .bind(limits.max_users)
        .bind(limits.max_projects)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)
}

/// Change a tenant's lifecycle status (suspend or reactivate).
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the tenant doesn't exist.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update_status(
    conn: &mut PgConnection,
    id: TenantId,
    status: TenantStatus,
) -> Result<Tenant, RepositoryError> {
    let query = format!(
        "UPDATE tenant SET status = $1, updated_at = now() \
         WHERE id = $2 \
         RETURNING {TENANT_COLUMNS}"
    );

    sqlx::query_as::<_, Tenant>(&query)
        .bind(status)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)
}
