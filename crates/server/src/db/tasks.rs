//! Task repository. Every statement filters on the caller's tenant.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use taskdeck_core::{ProjectId, TaskId, TaskPriority, TaskStatus, TenantId, UserId};

use super::RepositoryError;
use crate::models::Task;

const TASK_COLUMNS: &str = "id, title, description, status, priority, tenant_id, project_id, \
                            assigned_to_id, due_date, created_at, updated_at";

/// Parameters for inserting a new task.
#[derive(Debug)]
pub struct NewTask<'a> {
    pub id: TaskId,
    pub tenant_id: TenantId,
    pub project_id: ProjectId,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub priority: TaskPriority,
    pub assigned_to_id: Option<UserId>,
    pub due_date: Option<DateTime<Utc>>,
}

/// List a project's tasks, newest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_project(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    project_id: ProjectId,
) -> Result<Vec<Task>, RepositoryError> {
    let query = format!(
        "SELECT {TASK_COLUMNS} FROM task \
         WHERE tenant_id = $1 AND project_id = $2 \
         ORDER BY created_at DESC"
    );

    Ok(sqlx::query_as::<_, Task>(&query)
        .bind(tenant_id)
        .bind(project_id)
        .fetch_all(conn)
        .await?)
}

/// Get a task within the caller's tenant.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_in_tenant(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    id: TaskId,
) -> Result<Option<Task>, RepositoryError> {
    let query = format!("SELECT {TASK_COLUMNS} FROM task WHERE tenant_id = $1 AND id = $2");

    Ok(sqlx::query_as::<_, Task>(&query)
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(conn)
        .await?)
}

/// Insert a new task.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(conn: &mut PgConnection, new_task: NewTask<'_>) -> Result<Task, RepositoryError> {
    let query = format!(
        "INSERT INTO task \
         (id, title, description, status, priority, tenant_id, project_id, assigned_to_id, due_date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING {TASK_COLUMNS}"
    );

    Ok(sqlx::query_as::<_, Task>(&query)
        .bind(new_task.id)
        .bind(new_task.title)
        .bind(new_task.description)
        .bind(TaskStatus::Todo)
        .bind(new_task.priority)
        .bind(new_task.tenant_id)
        .bind(new_task.project_id)
        .bind(new_task.assigned_to_id)
        .bind(new_task.due_date)
        .fetch_one(conn)
        .await?)
}

/// Overwrite a task's mutable columns (everything except status).
///
/// Callers read the current row first (inside the same transaction) and pass
/// the merged values.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the task doesn't exist in the tenant.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    id: TaskId,
    title: &str,
    description: Option<&str>,
    priority: TaskPriority,
    assigned_to_id: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
) -> Result<Task, RepositoryError> {
    let query = format!(
        "UPDATE task \
         SET title = $1, description = $2, priority = $3, assigned_to_id = $4, \
             due_date = $5, updated_at = now() \
         WHERE tenant_id = $6 AND id = $7 \
         RETURNING {TASK_COLUMNS}"
    );

    sqlx::query_as::<_, Task>(&query)
        .bind(title)
        .bind(description)
        .bind(priority)
        .bind(assigned_to_id)
        .bind(due_date)
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)
}

/// Set a task's workflow status.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the task doesn't exist in the tenant.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update_status(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    id: TaskId,
    status: TaskStatus,
) -> Result<Task, RepositoryError> {
    let query = format!(
        "UPDATE task SET status = $1, updated_at = now() \
         WHERE tenant_id = $2 AND id = $3 \
         RETURNING {TASK_COLUMNS}"
    );

    sqlx::query_as::<_, Task>(&query)
        .bind(status)
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(RepositoryError::NotFound)
}

/// Delete a task within the caller's tenant.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the task doesn't exist in the tenant.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn delete(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    id: TaskId,
) -> Result<(), RepositoryError> {
    let result = sqlx::query("DELETE FROM task WHERE tenant_id = $1 AND id = $2")
        .bind(tenant_id)
        .bind(id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    Ok(())
}
