//! Integration tests for user deletion and role-change guards.
//!
//! Two invariants: callers cannot delete their own account, and a tenant
//! must always retain at least one tenant_admin.
//!
//! Run with: cargo test -p taskdeck-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use taskdeck_integration_tests::{TEST_PASSWORD, TestContext};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_cannot_delete_own_account() {
    let ctx = TestContext::new();
    let (_subdomain, token, data) = ctx.register_tenant().await;
    let admin_id = data["adminUser"]["id"].as_str().expect("admin id");

    let resp = ctx.delete(&token, &format!("/users/{admin_id}")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["message"], json!("You cannot delete your own account"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_cannot_delete_last_admin() {
    let ctx = TestContext::new();
    let (subdomain, admin1_token, data) = ctx.register_tenant().await;
    let admin1_id = data["adminUser"]["id"].as_str().expect("admin id");

    // A second admin deletes the first: allowed while two admins exist.
    let admin2_email = format!("admin2@{subdomain}.example.com");
    ctx.create_user(&admin1_token, &admin2_email, "tenant_admin")
        .await;
    let admin2_token = ctx
        .login(&admin2_email, TEST_PASSWORD, Some(&subdomain))
        .await
        .expect("second admin login");

    let resp = ctx
        .delete(&admin2_token, &format!("/users/{admin1_id}"))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Now admin2 is the sole admin. A third party cannot remove them.
    let member_email = format!("member@{subdomain}.example.com");
    ctx.create_user(&admin2_token, &member_email, "user").await;

    let resp = ctx.get(&admin2_token, "/users").await;
    let body: Value = resp.json().await.expect("users body");
    let admin2_id = body["data"]
        .as_array()
        .expect("user list")
        .iter()
        .find(|user| user["email"] == json!(admin2_email))
        .and_then(|user| user["id"].as_str())
        .expect("admin2 id")
        .to_string();

    // Deleting the sole remaining admin is rejected regardless of caller.
    // (Self-deletion would already be blocked; use the record-level check by
    // demoting instead.)
    let resp = ctx
        .put(
            &admin2_token,
            &format!("/users/{admin2_id}"),
            &json!({ "role": "user" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp_body: Value = resp.json().await.expect("body");
    assert_eq!(
        resp_body["message"],
        json!("Tenant must have at least one admin")
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_non_admin_cannot_manage_users() {
    let ctx = TestContext::new();
    let (subdomain, admin_token, _data) = ctx.register_tenant().await;

    let member_email = format!("member@{subdomain}.example.com");
    ctx.create_user(&admin_token, &member_email, "user").await;
    let member_token = ctx
        .login(&member_email, TEST_PASSWORD, Some(&subdomain))
        .await
        .expect("member login");

    let resp = ctx.get(&member_token, "/users").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = ctx
        .post(
            &member_token,
            "/users",
            &json!({
                "email": format!("sneaky@{subdomain}.example.com"),
                "password": TEST_PASSWORD,
                "fullName": "Sneaky",
                "role": "user",
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_email_in_tenant_conflicts() {
    let ctx = TestContext::new();
    let (subdomain, token, _data) = ctx.register_tenant().await;

    let email = format!("member@{subdomain}.example.com");
    ctx.create_user(&token, &email, "user").await;

    let resp = ctx
        .post(
            &token,
            "/users",
            &json!({
                "email": email,
                "password": TEST_PASSWORD,
                "fullName": "Duplicate",
                "role": "user",
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(
        body["message"],
        json!("Email already exists in this tenant")
    );
}
