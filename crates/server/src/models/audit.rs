//! Audit log domain types.
//!
//! Audit rows are append-only and write-only from the application's point
//! of view: there is no read surface, so only the insert shape lives here.

use uuid::Uuid;

use taskdeck_core::{AuditAction, TenantId, UserId};

/// A pending audit entry, appended inside the mutation's transaction.
#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub tenant_id: Option<TenantId>,
    pub user_id: UserId,
    pub action: AuditAction,
    pub entity_id: Uuid,
    pub ip_address: Option<String>,
}

impl NewAuditLog {
    /// Build an entry for `action` against `entity_id`, attributed to
    /// `user_id` within `tenant_id`.
    #[must_use]
    pub const fn new(
        tenant_id: Option<TenantId>,
        user_id: UserId,
        action: AuditAction,
        entity_id: Uuid,
        ip_address: Option<String>,
    ) -> Self {
        Self {
            tenant_id,
            user_id,
            action,
            entity_id,
            ip_address,
        }
    }
}
