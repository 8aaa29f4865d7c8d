//! Project repository. Every statement filters on the caller's tenant.

use sqlx::PgConnection;

use taskdeck_core::{ProjectId, ProjectStatus, TenantId, UserId};

use super::RepositoryError;
use crate::models::Project;

const PROJECT_COLUMNS: &str =
    "id, name, description, status, tenant_id, created_by_id, created_at, updated_at";

/// List a tenant's projects, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_tenant(
    conn: &mut PgConnection,
    tenant_id: TenantId,
) -> Result<Vec<Project>, RepositoryError> {
    let query = format!(
        "SELECT {PROJECT_COLUMNS} FROM project \
         WHERE tenant_id = $1 ORDER BY created_at DESC"
    );

    Ok(sqlx::query_as::<_, Project>(&query)
        .bind(tenant_id)
        .fetch_all(conn)
        .await?)
}

/// Get a project within the caller's tenant.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_in_tenant(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    id: ProjectId,
) -> Result<Option<Project>, RepositoryError> {
    let query = format!("SELECT {PROJECT_COLUMNS} FROM project WHERE tenant_id = $1 AND id = $2");

    Ok(sqlx::query_as::<_, Project>(&query)
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(conn)
        .await?)
}

/// Count a tenant's projects, for quota enforcement.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn count_for_tenant(
    conn: &mut PgConnection,
    tenant_id: TenantId,
) -> Result<i64, RepositoryError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM project WHERE tenant_id = $1")
        .bind(tenant_id)
        .fetch_one(conn)
        .await?;

    Ok(count)
}

/// Insert a new project.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut PgConnection,
    id: ProjectId,
    tenant_id: TenantId,
    created_by_id: UserId,
    name: &str,
    description: Option<&str>,
) -> Result<Project, RepositoryError> {
    let query = format!(
        "INSERT INTO project (id, name, description, status, tenant_id, created_by_id) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {PROJECT_COLUMNS}"
    );

    Ok(sqlx::query_as::<_, Project>(&query)
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(ProjectStatus::Active)
        .bind(tenant_id)
        .bind(created_by_id)
        .fetch_one(conn)
        .await?)
}

/// Overwrite a project's mutable columns.
///
/// Callers read the current row first (inside the same transaction) and pass
/// the merged values.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the project doesn't exist in the tenant.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    id: ProjectId,
    name: &str,
    description: Option<&str>,
    status: ProjectStatus,
) -> Result<Project, RepositoryError> {
    let query = format!(
        "UPDATE project \
         SET name = $1, description = $2, status = $3, updated_at = now() \
         WHERE tenant_id = $4 AND id = $5 \
         RETURNING {PROJECT_COLUMNS}"
    );

    sqlx::query_as::<_, Project>(&query)
        .bind(name)
        .bind(description)
        .bind(status)
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)
}

/// Delete a project within the caller's tenant.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the project doesn't exist in the tenant.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn delete(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    id: ProjectId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM project WHERE tenant_id = $1 AND id = $2")
        .bind(tenant_id)
        .bind(id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}
