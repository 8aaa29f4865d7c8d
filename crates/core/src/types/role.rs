//! User roles and the role → capability table.

use serde::{Deserialize, Serialize};

/// Role of a user account.
///
/// Roles form the coarse-grained authorization policy: which operations a
/// caller may attempt at all. Record-level rules (such as the assignee-only
/// task status update for regular users) are enforced in the services on top
/// of these checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform-wide operator, not bound to any tenant.
    SuperAdmin,
    /// Highest-privilege role within a single tenant.
    TenantAdmin,
    /// Regular tenant member.
    User,
}

impl Role {
    /// Whether this role operates platform-wide, outside tenant scoping.
    #[must_use]
    pub const fn is_super_admin(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Whether this role may create, update, and delete projects in its tenant.
    #[must_use]
    pub const fn can_manage_projects(self) -> bool {
        matches!(self, Self::TenantAdmin)
    }

    /// Whether this role may manage user accounts in its tenant.
    #[must_use]
    pub const fn can_manage_users(self) -> bool {
        matches!(self, Self::TenantAdmin)
    }

    /// Whether this role may update or delete arbitrary tasks in its tenant.
    ///
    /// Regular users may still create tasks and transition the status of
    /// tasks assigned to themselves.
    #[must_use]
    pub const fn can_manage_tasks(self) -> bool {
        matches!(self, Self::TenantAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::TenantAdmin => write!(f, "tenant_admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "tenant_admin" => Ok(Self::TenantAdmin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_table() {
        assert!(Role::SuperAdmin.is_super_admin());
        assert!(!Role::SuperAdmin.can_manage_projects());

        assert!(Role::TenantAdmin.can_manage_projects());
        assert!(Role::TenantAdmin.can_manage_users());
        assert!(Role::TenantAdmin.can_manage_tasks());
        assert!(!Role::TenantAdmin.is_super_admin());

        assert!(!Role::User.can_manage_projects());
        assert!(!Role::User.can_manage_users());
        assert!(!Role::User.can_manage_tasks());
    }

    #[test]
    fn test_wire_format_is_snake_case() {
        let json = serde_json::to_string(&Role::TenantAdmin).unwrap();
        assert_eq!(json, "\"tenant_admin\"");

        let parsed: Role = serde_json::from_str("\"super_admin\"").unwrap();
        assert_eq!(parsed, Role::SuperAdmin);
    }

    #[test]
    fn test_from_str_roundtrip() {
        for role in [Role::SuperAdmin, Role::TenantAdmin, Role::User] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("admin".parse::<Role>().is_err());
    }
}
