//! Domain types and wire-format DTOs.
//!
//! Domain structs serialize in camelCase, matching the JSON API surface.
//! Sensitive columns (password hashes) never appear on domain types that
//! cross the HTTP boundary.

pub mod audit;
pub mod project;
pub mod task;
pub mod tenant;
pub mod user;

pub use audit::NewAuditLog;
pub use project::Project;
pub use task::Task;
pub use tenant::Tenant;
pub use user::User;
