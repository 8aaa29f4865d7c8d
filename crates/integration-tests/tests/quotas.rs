//! Integration tests for plan-quota enforcement.
//!
//! Fresh tenants are on the free plan: 5 users, 5 projects. Creation at the
//! ceiling is rejected with 403; below it, it succeeds.
//!
//! Run with: cargo test -p taskdeck-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use taskdeck_integration_tests::TestContext;

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_project_creation_stops_at_plan_limit() {
    let ctx = TestContext::new();
    let (_subdomain, token, _data) = ctx.register_tenant().await;

    // Free plan: 5 projects. All five creations succeed.
    for i in 1..=5 {
        let resp = ctx
            .post(&token, "/projects", &json!({ "name": format!("Project {i}") }))
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED, "project {i} should fit");
    }

    // The sixth is over the ceiling.
    let resp = ctx
        .post(&token, "/projects", &json!({ "name": "Project 6" }))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("Project limit reached for current plan")
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_user_creation_stops_at_plan_limit() {
    let ctx = TestContext::new();
    let (subdomain, token, _data) = ctx.register_tenant().await;

    // Free plan: 5 users, one of which is the registration admin.
    for i in 1..=4 {
        ctx.create_user(
            &token,
            &format!("member{i}@{subdomain}.example.com"),
            "user",
        )
        .await;
    }

    let resp = ctx
        .post(
            &token,
            "/users",
            &json!({
                "email": format!("member5@{subdomain}.example.com"),
                "password": taskdeck_integration_tests::TEST_PASSWORD,
                "fullName": "One Too Many",
                "role": "user",
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], json!("User limit reached for current plan"));
}

#[tokio::test]
#[ignore = "Requires running server and a seeded database (td-cli seed)"]
async fn test_plan_upgrade_raises_the_ceiling() {
    let ctx = TestContext::new();
    let (_subdomain, token, data) = ctx.register_tenant().await;
    let tenant_id = data["tenantId"].as_str().expect("tenant id");

    // Fill the free-plan project quota.
    for i in 1..=5 {
        ctx.create_project(&token, &format!("Project {i}")).await;
    }
    let resp = ctx
        .post(&token, "/projects", &json!({ "name": "Project 6" }))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Super-admin upgrades the plan; the quota columns are rewritten.
    let super_token = ctx
        .login("superadmin@system.com", "Admin@123", None)
        .await
        .expect("seeded super-admin login");
    let resp = ctx
        .patch(
            &super_token,
            &format!("/tenants/{tenant_id}/plan"),
            &json!({ "subscriptionPlan": "pro" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("plan body");
    assert_eq!(body["data"]["maxProjects"], json!(15));
    assert_eq!(body["data"]["maxUsers"], json!(25));

    // The sixth project now fits.
    let resp = ctx
        .post(&token, "/projects", &json!({ "name": "Project 6" }))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
#[ignore = "Requires running server and a seeded database (td-cli seed)"]
async fn test_invalid_plan_is_rejected() {
    let ctx = TestContext::new();
    let (_subdomain, _token, data) = ctx.register_tenant().await;
    let tenant_id = data["tenantId"].as_str().expect("tenant id");

    let super_token = ctx
        .login("superadmin@system.com", "Admin@123", None)
        .await
        .expect("seeded super-admin login");

    let resp = ctx
        .patch(
            &super_token,
            &format!("/tenants/{tenant_id}/plan"),
            &json!({ "subscriptionPlan": "platinum" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], json!("Invalid plan"));
}
