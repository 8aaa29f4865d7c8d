//! Tenant service: self-service reads/renames and platform administration.

use serde::Deserialize;
use sqlx::PgPool;

use taskdeck_core::{AuditAction, SubscriptionPlan, TenantId, TenantStatus};

use crate::db::{audit, tenants};
use crate::error::AppError;
use crate::middleware::{AuthContext, TenantContext};
use crate::models::{NewAuditLog, Tenant};

/// Body of `PUT /tenants/me`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `PATCH /tenants/:id/plan`.
///
/// The plan arrives as a plain string and is parsed explicitly so an
/// unknown value maps to 400 `Invalid plan` rather than a generic
/// deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantPlanRequest {
    pub subscription_plan: String,
}

/// Body of `PATCH /tenants/:id/status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantStatusRequest {
    pub status: String,
}

/// Tenant service.
pub struct TenantService<'a> {
    pool: &'a PgPool,
}

impl<'a> TenantService<'a> {
    /// Create a new tenant service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the caller's own tenant.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the tenant row is gone.
    pub async fn my_tenant(&self, ctx: &TenantContext) -> Result<Tenant, AppError> {
        let mut conn = self.pool.acquire().await?;

        tenants::get_by_id(&mut conn, ctx.tenant_id)
            .await
            .map_err(|e| match e {
                crate::db::RepositoryError::NotFound => {
                    AppError::NotFound("Tenant not found".to_owned())
                }
                other => other.into(),
            })
    }

    /// Rename the caller's own tenant. Admin only; plan and status are
    /// super-admin territory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admin callers.
    pub async fn update_my_tenant(
        &self,
        ctx: &TenantContext,
        ip: Option<String>,
        req: UpdateTenantRequest,
    ) -> Result<Tenant, AppError> {
        if !ctx.role.can_manage_users() {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }

        let mut tx = self.pool.begin().await?;

        let tenant = match req.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => tenants::update_name(&mut tx, ctx.tenant_id, name).await?,
            None => tenants::get_by_id(&mut tx, ctx.tenant_id).await?,
        };

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(ctx.tenant_id),
                ctx.user_id,
                AuditAction::UpdateTenant,
                tenant.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(tenant)
    }

    /// List all tenants, newest first. Callers are gated to super-admins by
    /// the route extractor; this read is deliberately unscoped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` on storage failures.
    pub async fn list_all(&self) -> Result<Vec<Tenant>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(tenants::list_all(&mut conn).await?)
    }

    /// Change a tenant's subscription plan, rewriting both quota columns
    /// from the plan table in the same statement.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown plan,
    /// `AppError::NotFound` for an unknown tenant.
    pub async fn update_plan(
        &self,
        ctx: &AuthContext,
        ip: Option<String>,
        tenant_id: TenantId,
        req: UpdateTenantPlanRequest,
    ) -> Result<Tenant, AppError> {
        let plan: SubscriptionPlan = req
            .subscription_plan
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid plan".to_owned()))?;

        let mut tx = self.pool.begin().await?;

        let tenant = tenants::update_plan(&mut tx, tenant_id, plan, plan.limits())
            .await
            .map_err(|e| match e {
                crate::db::RepositoryError::NotFound => {
                    AppError::NotFound("Tenant not found".to_owned())
                }
                other => other.into(),
            })?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(tenant.id),
                ctx.user_id,
                AuditAction::UpdateTenantPlan,
                tenant.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(tenant)
    }

    /// Suspend or reactivate a tenant.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown status,
    /// `AppError::NotFound` for an unknown tenant.
    pub async fn update_status(
        &self,
        ctx: &AuthContext,
        ip: Option<String>,
        tenant_id: TenantId,
        req: UpdateTenantStatusRequest,
    ) -> Result<Tenant, AppError> {
        let status = match req.status.as_str() {
            "active" => TenantStatus::Active,
            "suspended" => TenantStatus::Suspended,
            _ => return Err(AppError::BadRequest("Invalid tenant status".to_owned())),
        };

        let mut tx = self.pool.begin().await?;

        let tenant = tenants::update_status(&mut tx, tenant_id, status)
            .await
            .map_err(|e| match e {
                crate::db::RepositoryError::NotFound => {
                    AppError::NotFound("Tenant not found".to_owned())
                }
                other => other.into(),
            })?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(tenant.id),
                ctx.user_id,
                AuditAction::UpdateTenantStatus,
                tenant.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(tenant)
    }
}
