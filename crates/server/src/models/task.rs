//! Task domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taskdeck_core::{ProjectId, TaskId, TaskPriority, TaskStatus, TenantId, UserId};

/// A task within a project.
///
/// Carries a redundant `tenant_id` alongside `project_id` so every query can
/// filter on the caller's tenant without a join.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Parent project (same tenant).
    pub project_id: ProjectId,
    /// Assignee; must be an active user of the same tenant.
    pub assigned_to_id: Option<UserId>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task was last updated.
    pub updated_at: DateTime<Utc>,
}
