//! User repository.
//!
//! Regular accounts are always addressed as `(tenant_id, ...)`; the only
//! unscoped lookups are `get_by_id` (for `GET /auth/me`, where the ID comes
//! from a verified token) and the super-admin login path.

use sqlx::PgConnection;

use taskdeck_core::{Email, Role, TenantId, UserId};

use super::RepositoryError;
use crate::models::User;
use crate::models::user::UserWithPassword;

const USER_COLUMNS: &str =
    "id, email, full_name, role, tenant_id, is_active, created_at, updated_at";

/// Parameters for inserting a new user.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub id: UserId,
    pub tenant_id: Option<TenantId>,
    pub email: &'a Email,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub role: Role,
}

/// Find a super-admin account (no tenant) by email, with its password hash.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_super_admin_by_email(
    conn: &mut PgConnection,
    email: &Email,
) -> Result<Option<UserWithPassword>, RepositoryError> {
    let query = format!(
        "SELECT {USER_COLUMNS}, password_hash FROM app_user \
         WHERE email = $1 AND role = $2 AND tenant_id IS NULL"
    );

    Ok(sqlx::query_as::<_, UserWithPassword>(&query)
        .bind(email)
        .bind(Role::SuperAdmin)
        .fetch_optional(conn)
        .await?)
}

/// Find a tenant user by email, with its password hash.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_by_email_in_tenant(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    email: &Email,
) -> Result<Option<UserWithPassword>, RepositoryError> {
    let query = format!(
        "SELECT {USER_COLUMNS}, password_hash FROM app_user \
         WHERE tenant_id = $1 AND email = $2"
    );

    Ok(sqlx::query_as::<_, UserWithPassword>(&query)
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(conn)
        .await?)
}

/// Get a user by ID alone. Reserved for flows where the ID was taken from a
/// verified token, not from client input.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_id(
    conn: &mut PgConnection,
    id: UserId,
) -> Result<Option<User>, RepositoryError> {
    let query = format!("SELECT {USER_COLUMNS} FROM app_user WHERE id = $1");

    Ok(sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await?)
}

/// Get a user within the caller's tenant.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_in_tenant(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    id: UserId,
) -> Result<Option<User>, RepositoryError> {
    let query = format!("SELECT {USER_COLUMNS} FROM app_user WHERE tenant_id = $1 AND id = $2");

    Ok(sqlx::query_as::<_, User>(&query)
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(conn)
        .await?)
}

/// Get an active user within the caller's tenant, for assignee checks.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_active_in_tenant(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    id: UserId,
) -> Result<Option<User>, RepositoryError> {
    let query = format!(
        "SELECT {USER_COLUMNS} FROM app_user \
         WHERE tenant_id = $1 AND id = $2 AND is_active = TRUE"
    );

    Ok(sqlx::query_as::<_, User>(&query)
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(conn)
        .await?)
}

/// List all users of a tenant, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_tenant(
    conn: &mut PgConnection,
    tenant_id: TenantId,
) -> Result<Vec<User>, RepositoryError> {
    let query = format!(
        "SELECT {USER_COLUMNS} FROM app_user \
         WHERE tenant_id = $1 ORDER BY created_at DESC"
    );

    Ok(sqlx::query_as::<_, User>(&query)
        .bind(tenant_id)
        .fetch_all(conn)
        .await?)
}

/// Whether any account, in any tenant or tenant-less, uses this email.
///
/// Used by tenant registration, which rejects emails already known anywhere
/// on the platform.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn email_exists_anywhere(
    conn: &mut PgConnection,
    email: &Email,
) -> Result<bool, RepositoryError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM app_user WHERE email = $1)",
    )
    .bind(email)
    .fetch_one(conn)
    .await?;

    Ok(exists)
}

/// Insert a new user.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the email is already taken in the
/// tenant.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert(
    conn: &mut PgConnection,
    new_user: NewUser<'_>,
) -> Result<User, RepositoryError> {
    let query = format!(
        "INSERT INTO app_user (id, tenant_id, email, password_hash, full_name, role) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {USER_COLUMNS}"
    );

    sqlx::query_as::<_, User>(&query)
        .bind(new_user.id)
        .bind(new_user.tenant_id)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.full_name)
        .bind(new_user.role)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            RepositoryError::from_unique_violation(e, "Email already exists in this tenant")
        })
}

/// Overwrite a tenant user's name and role.
///
/// Callers read the current row first (inside the same transaction) and pass
/// the merged values.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user doesn't exist in the tenant.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    id: UserId,
    full_name: &str,
    role: Role,
) -> Result<User, RepositoryError> {
    let query = format!(
        "UPDATE app_user SET full_name = $1, role = $2, updated_at = now() \
         WHERE tenant_id = $3 AND id = $4 \
         RETURNING {USER_COLUMNS}"
    );

    sqlx::query_as::<_, User>(&query)
        .bind(full_name)
        .bind(role)
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)
}

/// Delete a tenant user.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user doesn't exist in the tenant.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn delete(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    id: UserId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM app_user WHERE tenant_id = $1 AND id = $2")
        .bind(tenant_id)
        .bind(id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}

/// Count all users of a tenant, for quota enforcement.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn count_for_tenant(
    conn: &mut PgConnection,
    tenant_id: TenantId,
) -> Result<i64, RepositoryError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM app_user WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_one(conn)
        .await?;

    Ok(count)
}

/// Count a tenant's admins, for the last-admin deletion guard.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn count_admins(
    conn: &mut PgConnection,
    tenant_id: TenantId,
) -> Result<i64, RepositoryError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM app_user WHERE tenant_id = $1 AND role = $2",
    )
    .bind(tenant_id)
    .bind(Role::TenantAdmin)
    .fetch_one(conn)
    .await?;

    Ok(count)
}
