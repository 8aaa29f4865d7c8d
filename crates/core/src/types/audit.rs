//! Audit actions recorded for state-changing operations.

use serde::{Deserialize, Serialize};

/// The operation an audit log entry records.
///
/// Serialized in SCREAMING_SNAKE_CASE, matching the stored `action` column.
/// The set is closed: every state-changing operation maps to exactly one
/// variant, and each successful mutation writes exactly one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "audit_action", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    RegisterTenant,
    Login,
    LoginSuperAdmin,
    Logout,
    CreateProject,
    UpdateProject,
    DeleteProject,
    CreateTask,
    UpdateTask,
    UpdateTaskStatus,
    DeleteTask,
    CreateUser,
    UpdateUser,
    DeleteUser,
    UpdateTenant,
    UpdateTenantPlan,
    UpdateTenantStatus,
}

impl AuditAction {
    /// The entity type this action operates on, as stored in `entity_type`.
    #[must_use]
    pub const fn entity_type(self) -> &'static str {
        match self {
            Self::RegisterTenant
            | Self::UpdateTenant
            | Self::UpdateTenantPlan
            | Self::UpdateTenantStatus => "tenant",
            Self::Login
            | Self::LoginSuperAdmin
            | Self::Logout
            | Self::CreateUser
            | Self::UpdateUser
            | Self::DeleteUser => "user",
            Self::CreateProject | Self::UpdateProject | Self::DeleteProject => "project",
            Self::CreateTask | Self::UpdateTask | Self::UpdateTaskStatus | Self::DeleteTask => {
                "task"
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&AuditAction::RegisterTenant).unwrap(),
            "\"REGISTER_TENANT\""
        );
        assert_eq!(
            serde_json::to_string(&AuditAction::UpdateTaskStatus).unwrap(),
            "\"UPDATE_TASK_STATUS\""
        );
        assert_eq!(
            serde_json::to_string(&AuditAction::LoginSuperAdmin).unwrap(),
            "\"LOGIN_SUPER_ADMIN\""
        );
    }

    #[test]
    fn test_entity_types() {
        assert_eq!(AuditAction::RegisterTenant.entity_type(), "tenant");
        assert_eq!(AuditAction::Login.entity_type(), "user");
        assert_eq!(AuditAction::CreateProject.entity_type(), "project");
        assert_eq!(AuditAction::DeleteTask.entity_type(), "task");
    }
}
