//! Subscription plans and their resource quotas.

use serde::{Deserialize, Serialize};

/// Subscription plan of a tenant.
///
/// The plan determines the tenant's resource quotas via [`SubscriptionPlan::limits`].
/// New tenants start on `Free`; only a super-admin can change the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "subscription_plan", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Pro,
    Enterprise,
}

/// Plan-derived ceilings on per-tenant resource counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    /// Maximum number of user accounts in the tenant.
    pub max_users: i32,
    /// Maximum number of projects in the tenant.
    pub max_projects: i32,
}

impl SubscriptionPlan {
    /// The quota table. Plan changes rewrite a tenant's stored limits from
    /// this table atomically; registration assigns the `Free` row.
    #[must_use]
    pub const fn limits(self) -> PlanLimits {
        match self {
            Self::Free => PlanLimits {
                max_users: 5,
                max_projects: 5,
            },
            Self::Pro => PlanLimits {
                max_users: 25,
                max_projects: 15,
            },
            Self::Enterprise => PlanLimits {
                max_users: 100,
                max_projects: 50,
            },
        }
    }
}

impl std::fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Pro => write!(f, "pro"),
            Self::Enterprise => write!(f, "enterprise"),
        }
    }
}

impl std::str::FromStr for SubscriptionPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(format!("invalid subscription plan: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_table() {
        assert_eq!(
            SubscriptionPlan::Free.limits(),
            PlanLimits {
                max_users: 5,
                max_projects: 5
            }
        );
        assert_eq!(
            SubscriptionPlan::Pro.limits(),
            PlanLimits {
                max_users: 25,
                max_projects: 15
            }
        );
        assert_eq!(
            SubscriptionPlan::Enterprise.limits(),
            PlanLimits {
                max_users: 100,
                max_projects: 50
            }
        );
    }

    #[test]
    fn test_default_plan_is_free() {
        assert_eq!(SubscriptionPlan::default(), SubscriptionPlan::Free);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "enterprise".parse::<SubscriptionPlan>().unwrap(),
            SubscriptionPlan::Enterprise
        );
        assert!("platinum".parse::<SubscriptionPlan>().is_err());
    }
}
