//! Database seeding command.
//!
//! Idempotently creates a demo data set:
//!
//! - platform super-admin `superadmin@system.com`
//! - tenant `demo` ("Demo Company", pro plan)
//! - tenant admin `admin@demo.com` plus two regular users
//! - two projects with five tasks between them
//!
//! Re-running the command against a seeded database is a no-op.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use uuid::Uuid;

use taskdeck_core::{Role, SubscriptionPlan, TenantStatus};

use super::CommandError;

const SUPER_ADMIN_EMAIL: &str = "superadmin@system.com";
const SUPER_ADMIN_PASSWORD: &str = "Admin@123";
const TENANT_ADMIN_EMAIL: &str = "admin@demo.com";
const TENANT_ADMIN_PASSWORD: &str = "Demo@123";
const USER_PASSWORD: &str = "User@123";

/// Seed the database with demo data.
///
/// # Errors
///
/// Returns `CommandError::Database` if any statement fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Seeding database...");

    seed_super_admin(&pool).await?;
    let tenant_id = seed_tenant(&pool).await?;
    let admin_id = seed_user(
        &pool,
        tenant_id,
        TENANT_ADMIN_EMAIL,
        TENANT_ADMIN_PASSWORD,
        "Demo Admin",
        Role::TenantAdmin,
    )
    .await?;
    seed_user(
        &pool,
        tenant_id,
        "user1@demo.com",
        USER_PASSWORD,
        "User One",
        Role::User,
    )
    .await?;
    seed_user(
        &pool,
        tenant_id,
        "user2@demo.com",
        USER_PASSWORD,
        "User Two",
        Role::User,
    )
    .await?;

    let alpha = seed_project(&pool, tenant_id, admin_id, "Project Alpha").await?;
    let beta = seed_project(&pool, tenant_id, admin_id, "Project Beta").await?;

    seed_task(&pool, tenant_id, alpha, "Task 1").await?;
    seed_task(&pool, tenant_id, alpha, "Task 2").await?;
    seed_task(&pool, tenant_id, beta, "Task 3").await?;
    seed_task(&pool, tenant_id, beta, "Task 4").await?;
    seed_task(&pool, tenant_id, beta, "Task 5").await?;

    tracing::info!("Database seeded successfully");
    Ok(())
}

fn hash(password: &str) -> Result<String, CommandError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| CommandError::Hashing(e.to_string()))
}

async fn seed_super_admin(pool: &PgPool) -> Result<(), CommandError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM app_user WHERE email = $1 AND tenant_id IS NULL)",
    )
    .bind(SUPER_ADMIN_EMAIL)
    .fetch_one(pool)
    .await?;

    if exists {
        tracing::info!("super-admin already exists");
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO app_user (id, tenant_id, email, password_hash, full_name, role) \
         VALUES ($1, NULL, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(SUPER_ADMIN_EMAIL)
    .bind(hash(SUPER_ADMIN_PASSWORD)?)
    .bind("System Super Admin")
    .bind(Role::SuperAdmin)
    .execute(pool)
    .await?;

    tracing::info!("super-admin created");
    Ok(())
}

async fn seed_tenant(pool: &PgPool) -> Result<Uuid, CommandError> {
    if let Some(id) =
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM tenant WHERE subdomain = 'demo'")
            .fetch_optional(pool)
            .await?
    {
        tracing::info!("tenant ready");
        return Ok(id);
    }

    let plan = SubscriptionPlan::Pro;
    let limits = plan.limits();
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO tenant (id, name, subdomain, status, subscription_plan, max_users, max_projects) \
         VALUES ($1, $2, 'demo', $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind("Demo Company")
    .bind(TenantStatus::Active)
    .bind(plan)
    .bind(limits.max_users)
    .bind(limits.max_projects)
    .fetch_one(pool)
    .await?;

    tracing::info!("tenant created");
    Ok(id)
}

async fn seed_user(
    pool: &PgPool,
    tenant_id: Uuid,
    email: &str,
    password: &str,
    full_name: &str,
    role: Role,
) -> Result<Uuid, CommandError> {
    if let Some(id) = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM app_user WHERE tenant_id = $1 AND email = $2",
    )
    .bind(tenant_id)
    .bind(email)
    .fetch_optional(pool)
    .await?
    {
        return Ok(id);
    }

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO app_user (id, tenant_id, email, password_hash, full_name, role) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(tenant_id)
    .bind(email)
    .bind(hash(password)?)
    .bind(full_name)
    .bind(role)
    .fetch_one(pool)
    .await?;

    tracing::info!(email, "user created");
    Ok(id)
}

async fn seed_project(
    pool: &PgPool,
    tenant_id: Uuid,
    created_by_id: Uuid,
    name: &str,
) -> Result<Uuid, CommandError> {
    if let Some(id) = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM project WHERE tenant_id = $1 AND name = $2",
    )
    .bind(tenant_id)
    .bind(name)
    .fetch_optional(pool)
    .await?
    {
        return Ok(id);
    }

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO project (id, name, status, tenant_id, created_by_id) \
         VALUES ($1, $2, 'active', $3, $4) \
         RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(tenant_id)
    .bind(created_by_id)
    .fetch_one(pool)
    .await?;

    tracing::info!(name, "project created");
    Ok(id)
}

async fn seed_task(
    pool: &PgPool,
    tenant_id: Uuid,
    project_id: Uuid,
    title: &str,
) -> Result<(), CommandError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM task WHERE tenant_id = $1 AND project_id = $2 AND title = $3)",
    )
    .bind(tenant_id)
    .bind(project_id)
    .bind(title)
    .fetch_one(pool)
    .await?;

    if exists {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO task (id, title, tenant_id, project_id) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(tenant_id)
    .bind(project_id)
    .execute(pool)
    .await?;

    Ok(())
}
