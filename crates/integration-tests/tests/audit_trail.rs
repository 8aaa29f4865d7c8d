//! Integration tests for the audit trail.
//!
//! The audit invariant is transactional: every successful mutation commits
//! with exactly one new audit row, and a failed mutation leaves none. These
//! tests assert against the database directly (`DATABASE_URL`), since the
//! API deliberately exposes no audit read surface.
//!
//! Run with: cargo test -p taskdeck-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;

use taskdeck_integration_tests::TestContext;

async fn db() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL for audit assertions");
    PgPool::connect(&url).await.expect("database connection")
}

async fn audit_count(pool: &PgPool, tenant_subdomain: &str) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM audit_log \
         WHERE tenant_id = (SELECT id FROM tenant WHERE subdomain = $1)",
    )
    .bind(tenant_subdomain)
    .fetch_one(pool)
    .await
    .expect("audit count query")
}

async fn latest_action(pool: &PgPool, tenant_subdomain: &str) -> (String, String) {
    sqlx::query_as(
        "SELECT action::TEXT, entity_type FROM audit_log \
         WHERE tenant_id = (SELECT id FROM tenant WHERE subdomain = $1) \
         ORDER BY created_at DESC LIMIT 1",
    )
    .bind(tenant_subdomain)
    .fetch_one(pool)
    .await
    .expect("latest audit row")
}

#[tokio::test]
#[ignore = "Requires running server and DATABASE_URL access"]
async fn test_successful_mutation_writes_exactly_one_audit_row() {
    let ctx = TestContext::new();
    let pool = db().await;
    let (subdomain, token, _data) = ctx.register_tenant().await;

    // register (1 row) + admin login (1 row)
    let baseline = audit_count(&pool, &subdomain).await;

    ctx.create_project(&token, "Audited Project").await;

    assert_eq!(audit_count(&pool, &subdomain).await, baseline + 1);
    let (action, entity_type) = latest_action(&pool, &subdomain).await;
    assert_eq!(action, "CREATE_PROJECT");
    assert_eq!(entity_type, "project");
}

#[tokio::test]
#[ignore = "Requires running server and DATABASE_URL access"]
async fn test_failed_mutation_writes_no_audit_row() {
    let ctx = TestContext::new();
    let pool = db().await;
    let (subdomain, token, _data) = ctx.register_tenant().await;

    let baseline = audit_count(&pool, &subdomain).await;

    // A task create that fails its referential check: the project exists in
    // no tenant, so the transaction rolls back before any write.
    let missing_project = uuid::Uuid::new_v4();
    let resp = ctx
        .post(
            &token,
            &format!("/projects/{missing_project}/tasks"),
            &json!({ "title": "Orphan" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(audit_count(&pool, &subdomain).await, baseline);
}

#[tokio::test]
#[ignore = "Requires running server and DATABASE_URL access"]
async fn test_registration_audits_inside_the_same_transaction() {
    let ctx = TestContext::new();
    let pool = db().await;
    let (subdomain, _token, data) = ctx.register_tenant().await;

    let rows: Vec<(String, Value)> = sqlx::query_as::<_, (String, String)>(
        "SELECT action::TEXT, entity_id::TEXT FROM audit_log \
         WHERE tenant_id = (SELECT id FROM tenant WHERE subdomain = $1) \
         AND action = 'REGISTER_TENANT'",
    )
    .bind(&subdomain)
    .fetch_all(&pool)
    .await
    .expect("register audit rows")
    .into_iter()
    .map(|(action, entity_id)| (action, json!(entity_id)))
    .collect();

    assert_eq!(rows.len(), 1, "exactly one REGISTER_TENANT row");
    assert_eq!(rows[0].1, data["tenantId"]);
}
