//! Project domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taskdeck_core::{ProjectId, ProjectStatus, TenantId, UserId};

/// A project, strictly scoped to one tenant.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project ID.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// User who created the project; `None` once that account is deleted.
    pub created_by_id: Option<UserId>,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project was last updated.
    pub updated_at: DateTime<Utc>,
}
