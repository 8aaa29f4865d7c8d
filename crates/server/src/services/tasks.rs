//! Task service: tenant-scoped CRUD with referential checks and the
//! assignee-only status rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use sqlx::PgPool;

use taskdeck_core::{AuditAction, ProjectId, TaskId, TaskPriority, TaskStatus, UserId};

use crate::db::{audit, projects, tasks, users};
use crate::error::{AppError, FieldError};
use crate::middleware::TenantContext;
use crate::models::{NewAuditLog, Task};

/// Deserialize a field that distinguishes "absent" from "null": absent maps
/// to `None` (leave unchanged), `null` to `Some(None)` (clear).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `POST /projects/:projectId/tasks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub assigned_to_id: Option<UserId>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Body of `PUT /tasks/:id`. Absent fields are left unchanged; an explicit
/// `"assignedToId": null` unassigns the task.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to_id: Option<Option<UserId>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Body of `PATCH /tasks/:id/status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskStatusRequest {
    pub status: TaskStatus,
}

/// Task service.
pub struct TaskService<'a> {
    pool: &'a PgPool,
}

impl<'a> TaskService<'a> {
    /// Create a new task service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a project's tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the project is not in the caller's
    /// tenant.
    pub async fn list(
        &self,
        ctx: &TenantContext,
        project_id: ProjectId,
    ) -> Result<Vec<Task>, AppError> {
        let mut conn = self.pool.acquire().await?;

        projects::get_in_tenant(&mut conn, ctx.tenant_id, project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_owned()))?;

        Ok(tasks::list_for_project(&mut conn, ctx.tenant_id, project_id).await?)
    }

    /// Create a task in a project.
    ///
    /// Inside one transaction: the project must belong to the caller's
    /// tenant, the assignee (if any) must be an active user of the same
    /// tenant, then the insert and the audit entry commit together.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for a foreign or missing project,
    /// `AppError::BadRequest` for an invalid assignee,
    /// `AppError::Validation` on malformed fields.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        ip: Option<String>,
        project_id: ProjectId,
        req: CreateTaskRequest,
    ) -> Result<Task, AppError> {
        if req.title.trim().is_empty() {
            return Err(AppError::Validation(vec![FieldError::new(
                "title",
                "task title cannot be empty".to_owned(),
            )]));
        }

        let mut tx = self.pool.begin().await?;

        projects::get_in_tenant(&mut tx, ctx.tenant_id, project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_owned()))?;

        if let Some(assignee_id) = req.assigned_to_id {
            ensure_assignable(&mut tx, ctx, assignee_id).await?;
        }

        let task = tasks::insert(
            &mut tx,
            tasks::NewTask {
                id: TaskId::generate(),
                tenant_id: ctx.tenant_id,
                project_id,
                title: req.title.trim(),
                description: req.description.as_deref(),
                priority: req.priority.unwrap_or_default(),
                assigned_to_id: req.assigned_to_id,
                due_date: req.due_date,
            },
        )
        .await?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(ctx.tenant_id),
                ctx.user_id,
                AuditAction::CreateTask,
                task.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(task)
    }

    /// Update a task's title, description, priority, assignee, or due date.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admin callers,
    /// `AppError::NotFound` if the task is not in the caller's tenant,
    /// `AppError::BadRequest` for an invalid assignee.
    pub async fn update(
        &self,
        ctx: &TenantContext,
        ip: Option<String>,
        id: TaskId,
        req: UpdateTaskRequest,
    ) -> Result<Task, AppError> {
        if !ctx.role.can_manage_tasks() {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }
        if let Some(title) = &req.title
            && title.trim().is_empty()
        {
            return Err(AppError::Validation(vec![FieldError::new(
                "title",
                "task title cannot be empty".to_owned(),
            )]));
        }

        let mut tx = self.pool.begin().await?;

        let current = tasks::get_in_tenant(&mut tx, ctx.tenant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_owned()))?;

        let assigned_to_id = match req.assigned_to_id {
            Some(Some(assignee_id)) => {
                ensure_assignable(&mut tx, ctx, assignee_id).await?;
                Some(assignee_id)
            }
            Some(None) => None,
            None => current.assigned_to_id,
        };

        let title = req.title.as_deref().map_or(current.title, |t| t.trim().to_owned());
        let description = req.description.or(current.description);
        let priority = req.priority.unwrap_or(current.priority);
        let due_date = req.due_date.or(current.due_date);

        let task = tasks::update(
            &mut tx,
            ctx.tenant_id,
            id,
            &title,
            description.as_deref(),
            priority,
            assigned_to_id,
            due_date,
        )
        .await?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(ctx.tenant_id),
                ctx.user_id,
                AuditAction::UpdateTask,
                task.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(task)
    }

    /// Transition a task's workflow status.
    ///
    /// Transitions themselves are unconstrained; the guard is on the caller:
    /// a `user`-role actor may only transition tasks assigned to themselves,
    /// regardless of tenant match.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the task is not in the caller's
    /// tenant, `AppError::Forbidden` for a non-assignee `user` caller.
    pub async fn update_status(
        &self,
        ctx: &TenantContext,
        ip: Option<String>,
        id: TaskId,
        req: UpdateTaskStatusRequest,
    ) -> Result<Task, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = tasks::get_in_tenant(&mut tx, ctx.tenant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_owned()))?;

        if !ctx.role.can_manage_tasks() && current.assigned_to_id != Some(ctx.user_id) {
            return Err(AppError::Forbidden(
                "You can only update your assigned tasks".to_owned(),
            ));
        }

        let task = tasks::update_status(&mut tx, ctx.tenant_id, id, req.status).await?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(ctx.tenant_id),
                ctx.user_id,
                AuditAction::UpdateTaskStatus,
                task.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(task)
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admin callers,
    /// `AppError::NotFound` if the task is not in the caller's tenant.
    pub async fn delete(
        &self,
        ctx: &TenantContext,
        ip: Option<String>,
        id: TaskId,
    ) -> Result<(), AppError> {
        if !ctx.role.can_manage_tasks() {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }

        let mut tx = self.pool.begin().await?;

        tasks::get_in_tenant(&mut tx, ctx.tenant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_owned()))?;

        tasks::delete(&mut tx, ctx.tenant_id, id).await?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(ctx.tenant_id),
                ctx.user_id,
                AuditAction::DeleteTask,
                id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(())
    }
}

/// Verify that `assignee_id` is an active user of the caller's tenant.
async fn ensure_assignable(
    conn: &mut sqlx::PgConnection,
    ctx: &TenantContext,
    assignee_id: UserId,
) -> Result<(), AppError> {
    users::get_active_in_tenant(conn, ctx.tenant_id, assignee_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Assigned user not found in tenant".to_owned()))?;
    Ok(())
}
