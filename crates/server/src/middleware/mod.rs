//! HTTP middleware stack for the API server.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Rate limiting (governor, auth routes only)
//!
//! Authentication is not a layer: handlers opt in via the extractors in
//! [`auth`], which verify the Bearer token and hand the handler an explicit,
//! read-only context.

pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::{AuthContext, ClientIp, RequireSuperAdmin, TenantContext};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
