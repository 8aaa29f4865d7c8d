//! Audit log repository.
//!
//! Strictly append-only: this module exposes a single insert. The table has
//! no UPDATE or DELETE path anywhere in the application.

use sqlx::PgConnection;

use taskdeck_core::AuditLogId;

use super::RepositoryError;
use crate::models::NewAuditLog;

/// Append one audit entry.
///
/// Runs on the mutation's own connection so the entry commits or rolls back
/// together with the change it records.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn append(conn: &mut PgConnection, entry: &NewAuditLog) -> Result<(), RepositoryError> {
    sqlx::query(
        "INSERT INTO audit_log (id, tenant_id, user_id, action, entity_type, entity_id, ip_address) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(AuditLogId::generate())
    .bind(entry.tenant_id)
    .bind(entry.user_id)
    .bind(entry.action)
    .bind(entry.action.entity_type())
    .bind(entry.entity_id)
    .bind(entry.ip_address.as_deref())
    .execute(conn)
    .await?;

    Ok(())
}
