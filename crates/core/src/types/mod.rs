//! Core types for Taskdeck.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod audit;
pub mod email;
pub mod id;
pub mod plan;
pub mod role;
pub mod status;
pub mod subdomain;

pub use audit::AuditAction;
pub use email::{Email, EmailError};
pub use id::*;
pub use plan::{PlanLimits, SubscriptionPlan};
pub use role::Role;
pub use status::{ProjectStatus, TaskPriority, TaskStatus, TenantStatus};
pub use subdomain::{Subdomain, SubdomainError};
