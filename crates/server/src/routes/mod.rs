//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness probe (no auth)
//! GET  /health/ready                - Readiness probe (no auth)
//!
//! # Auth
//! POST /auth/register-tenant        - Register a tenant + first admin (rate-limited)
//! POST /auth/login                  - Login, with or without tenant subdomain (rate-limited)
//! GET  /auth/me                     - Caller profile with tenant summary
//! POST /auth/logout                 - Record logout (tokens lapse at expiry)
//!
//! # Projects (tenant-scoped)
//! GET    /projects                  - List projects
//! POST   /projects                  - Create project (admin, quota-checked)
//! PUT    /projects/:id              - Update project (admin)
//! DELETE /projects/:id              - Delete project (admin)
//!
//! # Tasks (tenant-scoped)
//! GET    /projects/:projectId/tasks - List a project's tasks
//! POST   /projects/:projectId/tasks - Create task
//! PUT    /tasks/:id                 - Update task (admin)
//! PATCH  /tasks/:id/status          - Transition status (assignee rule for `user` role)
//! DELETE /tasks/:id                 - Delete task (admin)
//!
//! # Users (tenant-scoped, admin only)
//! GET    /users                     - List users
//! POST   /users                     - Create user (quota-checked)
//! PUT    /users/:id                 - Update user
//! DELETE /users/:id                 - Delete user (guarded)
//!
//! # Tenants
//! GET   /tenants/me                 - Caller's tenant
//! PUT   /tenants/me                 - Rename tenant (admin)
//! GET   /tenants                    - List all tenants (super-admin)
//! PATCH /tenants/:id/plan           - Change plan (super-admin)
//! PATCH /tenants/:id/status         - Suspend/reactivate (super-admin)
//! ```

pub mod auth;
pub mod projects;
pub mod tasks;
pub mod tenants;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
///
/// The credential-taking endpoints sit behind the strict rate limiter; the
/// token-holding ones do not.
pub fn auth_routes() -> Router<AppState> {
    let public = Router::new()
        .route("/register-tenant", post(auth::register_tenant))
        .route("/login", post(auth::login))
        .layer(auth_rate_limiter());

    Router::new()
        .merge(public)
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
}

/// Create the project routes router (task collection routes included, since
/// they are addressed through their project).
pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/{id}", put(projects::update).delete(projects::remove))
        .route("/{id}/tasks", get(tasks::list).post(tasks::create))
}

/// Create the task item routes router.
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(tasks::update).delete(tasks::remove))
        .route("/{id}/status", patch(tasks::update_status))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/{id}", put(users::update).delete(users::remove))
}

/// Create the tenant routes router.
pub fn tenant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(tenants::list))
        .route("/me", get(tenants::my_tenant).put(tenants::update_my_tenant))
        .route("/{id}/plan", patch(tenants::update_plan))
        .route("/{id}/status", patch(tenants::update_status))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/projects", project_routes())
        .nest("/tasks", task_routes())
        .nest("/users", user_routes())
        .nest("/tenants", tenant_routes())
}
