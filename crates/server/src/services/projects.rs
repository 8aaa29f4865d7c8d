//! Project service: tenant-scoped CRUD with quota enforcement.

use serde::Deserialize;
use sqlx::PgPool;

use taskdeck_core::{AuditAction, ProjectId, ProjectStatus};

use crate::db::{audit, projects, tenants};
use crate::error::{AppError, FieldError};
use crate::middleware::TenantContext;
use crate::models::{NewAuditLog, Project};

/// Body of `POST /projects`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `PUT /projects/:id`. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

/// Project service.
pub struct ProjectService<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectService<'a> {
    /// Create a new project service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the caller's tenant's projects, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failures.
    pub async fn list(&self, ctx: &TenantContext) -> Result<Vec<Project>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(projects::list_for_tenant(&mut conn, ctx.tenant_id).await?)
    }

    /// Create a project.
    ///
    /// The quota check, the insert, and the audit entry run in one
    /// transaction; a tenant at its plan's project ceiling is rejected.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admin callers or when the
    /// project quota is exhausted, `AppError::Validation` on malformed
    /// fields.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        ip: Option<String>,
        req: CreateProjectRequest,
    ) -> Result<Project, AppError> {
        if !ctx.role.can_manage_projects() {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }
        if req.name.trim().is_empty() {
            return Err(AppError::Validation(vec![FieldError::new(
                "name",
                "project name cannot be empty".to_owned(),
            )]));
        }

        let mut tx = self.pool.begin().await?;

        let tenant = tenants::get_by_id(&mut tx, ctx.tenant_id).await?;
        let project_count = projects::count_for_tenant(&mut tx, ctx.tenant_id).await?;
        if project_count >= i64::from(tenant.max_projects) {
            return Err(AppError::Forbidden(
                "Project limit reached for current plan".to_owned(),
            ));
        }

        let project = projects::insert(
            &mut tx,
            ProjectId::generate(),
            ctx.tenant_id,
            ctx.user_id,
            req.name.trim(),
            req.description.as_deref(),
        )
        .await?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(ctx.tenant_id),
                ctx.user_id,
                AuditAction::CreateProject,
                project.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    /// Update a project's name, description, or status.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admin callers,
    /// `AppError::NotFound` if the project is not in the caller's tenant.
    pub async fn update(
        &self,
        ctx: &TenantContext,
        ip: Option<String>,
        id: ProjectId,
        req: UpdateProjectRequest,
    ) -> Result<Project, AppError> {
        if !ctx.role.can_manage_projects() {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }
        if let Some(name) = &req.name
            && name.trim().is_empty()
        {
            return Err(AppError::Validation(vec![FieldError::new(
                "name",
                "project name cannot be empty".to_owned(),
            )]));
        }

        let mut tx = self.pool.begin().await?;

        let current = projects::get_in_tenant(&mut tx, ctx.tenant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_owned()))?;

        let name = req.name.as_deref().map_or(current.name, |n| n.trim().to_owned());
        let description = req.description.or(current.description);
        let status = req.status.unwrap_or(current.status);

        let project =
            projects::update(&mut tx, ctx.tenant_id, id, &name, description.as_deref(), status)
                .await?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(ctx.tenant_id),
                ctx.user_id,
                AuditAction::UpdateProject,
                project.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    /// Delete a project (and, via cascade, its tasks).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admin callers,
    /// `AppError::NotFound` if the project is not in the caller's tenant.
    pub async fn delete(
        &self,
        ctx: &TenantContext,
        ip: Option<String>,
        id: ProjectId,
    ) -> Result<(), AppError> {
        if !ctx.role.can_manage_projects() {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }

        let mut tx = self.pool.begin().await?;

        projects::get_in_tenant(&mut tx, ctx.tenant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_owned()))?;

        projects::delete(&mut tx, ctx.tenant_id, id).await?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(ctx.tenant_id),
                ctx.user_id,
                AuditAction::DeleteProject,
                id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(())
    }
}
