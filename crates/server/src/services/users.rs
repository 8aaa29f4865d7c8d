//! User service: tenant-scoped account management with quota and
//! admin-retention guards.

use serde::Deserialize;
use sqlx::PgPool;

use taskdeck_core::{AuditAction, Email, Role, UserId};

use crate::db::{audit, tenants, users};
use crate::error::{AppError, FieldError};
use crate::middleware::TenantContext;
use crate::models::{NewAuditLog, User};
use crate::services::password::{hash_password, password_policy_violation};

/// Body of `POST /users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
}

/// Body of `PUT /users/:id`. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// User service.
pub struct UserService<'a> {
    pool: &'a PgPool,
}

impl<'a> UserService<'a> {
    /// Create a new user service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the caller's tenant's users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admin callers.
    pub async fn list(&self, ctx: &TenantContext) -> Result<Vec<User>, AppError> {
        if !ctx.role.can_manage_users() {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }

        let mut conn = self.pool.acquire().await?;
        Ok(users::list_for_tenant(&mut conn, ctx.tenant_id).await?)
    }

    /// Create a user account in the caller's tenant.
    ///
    /// The quota check, the insert, and the audit entry run in one
    /// transaction; a tenant at its plan's user ceiling is rejected.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admin callers or when the user
    /// quota is exhausted, `AppError::Conflict` on a duplicate email within
    /// the tenant, `AppError::Validation` on malformed fields.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        ip: Option<String>,
        req: CreateUserRequest,
    ) -> Result<User, AppError> {
        if !ctx.role.can_manage_users() {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }

        let mut errors = Vec::new();
        let email = match Email::parse(&req.email) {
            Ok(e) => Some(e),
            Err(e) => {
                errors.push(FieldError::new("email", e.to_string()));
                None
            }
        };
        if let Some(violation) = password_policy_violation(&req.password) {
            errors.push(FieldError::new("password", violation));
        }
        if req.full_name.trim().is_empty() {
            errors.push(FieldError::new(
                "fullName",
                "full name cannot be empty".to_owned(),
            ));
        }
        if req.role == Role::SuperAdmin {
            errors.push(FieldError::new(
                "role",
                "role must be tenant_admin or user".to_owned(),
            ));
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        let Some(email) = email else {
            return Err(AppError::Internal("validation state mismatch".to_owned()));
        };

        let password_hash = hash_password(&req.password)?;

        let mut tx = self.pool.begin().await?;

        let tenant = tenants::get_by_id(&mut tx, ctx.tenant_id).await?;
        let user_count = users::count_for_tenant(&mut tx, ctx.tenant_id).await?;
        if user_count >= i64::from(tenant.max_users) {
            return Err(AppError::Forbidden(
                "User limit reached for current plan".to_owned(),
            ));
        }

        let user = users::insert(
            &mut tx,
            users::NewUser {
                id: UserId::generate(),
                tenant_id: Some(ctx.tenant_id),
                email: &email,
                password_hash: &password_hash,
                full_name: req.full_name.trim(),
                role: req.role,
            },
        )
        .await?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(ctx.tenant_id),
                ctx.user_id,
                AuditAction::CreateUser,
                user.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Update a user's name or role.
    ///
    /// Demoting the tenant's only admin is rejected: a tenant must always
    /// retain at least one `tenant_admin`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admin callers,
    /// `AppError::NotFound` if the user is not in the caller's tenant,
    /// `AppError::BadRequest` when the change would leave the tenant
    /// without an admin.
    pub async fn update(
        &self,
        ctx: &TenantContext,
        ip: Option<String>,
        id: UserId,
        req: UpdateUserRequest,
    ) -> Result<User, AppError> {
        if !ctx.role.can_manage_users() {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }
        if req.role == Some(Role::SuperAdmin) {
            return Err(AppError::Validation(vec![FieldError::new(
                "role",
                "role must be tenant_admin or user".to_owned(),
            )]));
        }
        if let Some(full_name) = &req.full_name
            && full_name.trim().is_empty()
        {
            return Err(AppError::Validation(vec![FieldError::new(
                "fullName",
                "full name cannot be empty".to_owned(),
            )]));
        }

        let mut tx = self.pool.begin().await?;

        let current = users::get_in_tenant(&mut tx, ctx.tenant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

        let role = req.role.unwrap_or(current.role);
        if current.role == Role::TenantAdmin
            && role != Role::TenantAdmin
            && users::count_admins(&mut tx, ctx.tenant_id).await? <= 1
        {
            return Err(AppError::BadRequest(
                "Tenant must have at least one admin".to_owned(),
            ));
        }

        let full_name = req
            .full_name
            .as_deref()
            .map_or(current.full_name, |n| n.trim().to_owned());

        let user = users::update(&mut tx, ctx.tenant_id, id, &full_name, role).await?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(ctx.tenant_id),
                ctx.user_id,
                AuditAction::UpdateUser,
                user.id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Delete a user account.
    ///
    /// Two guards: callers cannot delete their own account, and the
    /// tenant's last admin cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-admin callers,
    /// `AppError::NotFound` if the user is not in the caller's tenant,
    /// `AppError::BadRequest` when a guard rejects the deletion.
    pub async fn delete(
        &self,
        ctx: &TenantContext,
        ip: Option<String>,
        id: UserId,
    ) -> Result<(), AppError> {
        if !ctx.role.can_manage_users() {
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }

        let mut tx = self.pool.begin().await?;

        let target = users::get_in_tenant(&mut tx, ctx.tenant_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

        if target.id == ctx.user_id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_owned(),
            ));
        }

        if target.role == Role::TenantAdmin
            && users::count_admins(&mut tx, ctx.tenant_id).await? <= 1
        {
            return Err(AppError::BadRequest(
                "Tenant must have at least one admin".to_owned(),
            ));
        }

        users::delete(&mut tx, ctx.tenant_id, id).await?;

        audit::append(
            &mut tx,
            &NewAuditLog::new(
                Some(ctx.tenant_id),
                ctx.user_id,
                AuditAction::DeleteUser,
                id.as_uuid(),
                ip,
            ),
        )
        .await?;

        tx.commit().await?;

        Ok(())
    }
}
