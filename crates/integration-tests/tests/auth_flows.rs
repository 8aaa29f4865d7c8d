//! Integration tests for registration and login flows.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p taskdeck-server)
//!
//! Run with: cargo test -p taskdeck-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use taskdeck_integration_tests::{TEST_PASSWORD, TestContext, unique_subdomain};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_then_login_with_subdomain() {
    let ctx = TestContext::new();
    let subdomain = unique_subdomain();
    let admin_email = format!("admin@{subdomain}.example.com");

    let resp = ctx
        .client
        .post(format!("{}/auth/register-tenant", ctx.base_url))
        .json(&json!({
            "tenantName": "Acme",
            "subdomain": subdomain,
            "adminEmail": admin_email,
            "adminPassword": TEST_PASSWORD,
            "adminFullName": "Acme Admin",
        }))
        .send()
        .await
        .expect("register request");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("register body");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["subdomain"], json!(subdomain));
    assert_eq!(body["data"]["adminUser"]["role"], json!("tenant_admin"));

    // The tenant admin is tenant-scoped, not a super-admin: logging in
    // without a subdomain must fail.
    let resp = ctx.login_response(&admin_email, TEST_PASSWORD, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // With the subdomain, login succeeds and yields a token.
    let token = ctx
        .login(&admin_email, TEST_PASSWORD, Some(&subdomain))
        .await
        .expect("tenant-scoped login");
    assert!(!token.is_empty());
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_register_duplicate_subdomain_conflicts() {
    let ctx = TestContext::new();
    let (subdomain, _token, _data) = ctx.register_tenant().await;

    let resp = ctx
        .client
        .post(format!("{}/auth/register-tenant", ctx.base_url))
        .json(&json!({
            "tenantName": "Copycat",
            "subdomain": subdomain,
            "adminEmail": format!("other@{subdomain}.example.com"),
            "adminPassword": TEST_PASSWORD,
            "adminFullName": "Copycat Admin",
        }))
        .send()
        .await
        .expect("register request");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("conflict body");
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Subdomain already exists"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_login_wrong_password_is_unauthorized() {
    let ctx = TestContext::new();
    let (subdomain, _token, data) = ctx.register_tenant().await;
    let email = data["adminUser"]["email"].as_str().expect("email");

    let resp = ctx
        .login_response(email, "wrong-password!", Some(&subdomain))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], json!("Invalid credentials"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_login_unknown_subdomain_is_forbidden() {
    let ctx = TestContext::new();

    let resp = ctx
        .login_response(
            "nobody@example.com",
            TEST_PASSWORD,
            Some(&unique_subdomain()),
        )
        .await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], json!("Tenant not accessible"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_me_includes_tenant_summary() {
    let ctx = TestContext::new();
    let (subdomain, token, _data) = ctx.register_tenant().await;

    let resp = ctx.get(&token, "/auth/me").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("me body");
    assert_eq!(body["data"]["role"], json!("tenant_admin"));
    assert_eq!(body["data"]["tenant"]["subdomain"], json!(subdomain));
    // A fresh tenant starts on the free plan with its quotas.
    assert_eq!(body["data"]["tenant"]["subscriptionPlan"], json!("free"));
    assert_eq!(body["data"]["tenant"]["maxProjects"], json!(5));
    assert_eq!(body["data"]["tenant"]["maxUsers"], json!(5));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_logout_succeeds() {
    let ctx = TestContext::new();
    let (_subdomain, token, _data) = ctx.register_tenant().await;

    let resp = ctx.post(&token, "/auth/logout", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("logout body");
    assert_eq!(body["message"], json!("Logged out successfully"));
}

#[tokio::test]
#[ignore = "Requires running server and a seeded database (td-cli seed)"]
async fn test_super_admin_login_and_tenant_listing() {
    let ctx = TestContext::new();

    let token = ctx
        .login("superadmin@system.com", "Admin@123", None)
        .await
        .expect("seeded super-admin login");

    let resp = ctx.get(&token, "/tenants").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("tenants body");
    assert!(body["data"].as_array().expect("tenant list").iter().any(
        |tenant| tenant["subdomain"] == json!("demo")
    ));
}

#[tokio::test]
#[ignore = "Requires running server and a seeded database (td-cli seed)"]
async fn test_suspended_tenant_blocks_login() {
    let ctx = TestContext::new();
    let (subdomain, _token, data) = ctx.register_tenant().await;
    let tenant_id = data["tenantId"].as_str().expect("tenant id");
    let email = data["adminUser"]["email"].as_str().expect("email");

    let super_token = ctx
        .login("superadmin@system.com", "Admin@123", None)
        .await
        .expect("seeded super-admin login");

    let resp = ctx
        .patch(
            &super_token,
            &format!("/tenants/{tenant_id}/status"),
            &json!({ "status": "suspended" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Suspension keeps the data but blocks every login for the tenant.
    let resp = ctx
        .login_response(email, TEST_PASSWORD, Some(&subdomain))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], json!("Tenant not accessible"));

    // Reactivation restores access.
    let resp = ctx
        .patch(
            &super_token,
            &format!("/tenants/{tenant_id}/status"),
            &json!({ "status": "active" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        ctx.login(email, TEST_PASSWORD, Some(&subdomain))
            .await
            .is_some()
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_tenant_admin_cannot_list_tenants() {
    let ctx = TestContext::new();
    let (_subdomain, token, _data) = ctx.register_tenant().await;

    let resp = ctx.get(&token, "/tenants").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
