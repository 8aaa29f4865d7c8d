//! Integration tests for task authorization rules.
//!
//! Regular users may create and read tasks, and transition the status only
//! of tasks assigned to themselves; full updates and deletion are admin
//! operations.
//!
//! Run with: cargo test -p taskdeck-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use taskdeck_integration_tests::{TEST_PASSWORD, TestContext};

/// Set up a tenant with a project, two members, and a task assigned to each.
/// Returns (admin token, member1 token, member1's task, member2's task).
async fn setup(ctx: &TestContext) -> (String, String, String, String) {
    let (subdomain, admin_token, _data) = ctx.register_tenant().await;

    let member1_email = format!("member1@{subdomain}.example.com");
    let member2_email = format!("member2@{subdomain}.example.com");
    let member1_id = ctx.create_user(&admin_token, &member1_email, "user").await;
    let member2_id = ctx.create_user(&admin_token, &member2_email, "user").await;

    let project_id = ctx.create_project(&admin_token, "Sprint").await;

    let mut task_ids = Vec::new();
    for (title, assignee) in [("Task for 1", &member1_id), ("Task for 2", &member2_id)] {
        let resp = ctx
            .post(
                &admin_token,
                &format!("/projects/{project_id}/tasks"),
                &json!({ "title": title, "assignedToId": assignee }),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.expect("task body");
        task_ids.push(body["data"]["id"].as_str().expect("task id").to_string());
    }

    let member1_token = ctx
        .login(&member1_email, TEST_PASSWORD, Some(&subdomain))
        .await
        .expect("member1 login");

    let (task2_id, task1_id) = (
        task_ids.pop().expect("task 2"),
        task_ids.pop().expect("task 1"),
    );
    (admin_token, member1_token, task1_id, task2_id)
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_user_can_update_status_of_own_task() {
    let ctx = TestContext::new();
    let (_admin_token, member1_token, own_task, _other_task) = setup(&ctx).await;

    let resp = ctx
        .patch(
            &member1_token,
            &format!("/tasks/{own_task}/status"),
            &json!({ "status": "in_progress" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["data"]["status"], json!("in_progress"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_user_cannot_update_status_of_foreign_task() {
    let ctx = TestContext::new();
    let (_admin_token, member1_token, _own_task, other_task) = setup(&ctx).await;

    let resp = ctx
        .patch(
            &member1_token,
            &format!("/tasks/{other_task}/status"),
            &json!({ "status": "completed" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(
        body["message"],
        json!("You can only update your assigned tasks")
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_admin_can_update_status_of_any_task() {
    let ctx = TestContext::new();
    let (admin_token, _member1_token, task1, task2) = setup(&ctx).await;

    for task_id in [&task1, &task2] {
        let resp = ctx
            .patch(
                &admin_token,
                &format!("/tasks/{task_id}/status"),
                &json!({ "status": "completed" }),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_status_transitions_are_free_form() {
    let ctx = TestContext::new();
    let (admin_token, _member1_token, task1, _task2) = setup(&ctx).await;

    // completed -> todo is allowed: the workflow imposes no ordering.
    for status in ["completed", "todo", "in_progress"] {
        let resp = ctx
            .patch(
                &admin_token,
                &format!("/tasks/{task1}/status"),
                &json!({ "status": status }),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK, "transition to {status}");
    }
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_full_update_and_delete_are_admin_only() {
    let ctx = TestContext::new();
    let (admin_token, member1_token, own_task, _other_task) = setup(&ctx).await;

    // Even on their own task, a regular user cannot PUT or DELETE.
    let resp = ctx
        .put(
            &member1_token,
            &format!("/tasks/{own_task}"),
            &json!({ "title": "Renamed" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = ctx.delete(&member1_token, &format!("/tasks/{own_task}")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The admin can do both.
    let resp = ctx
        .put(
            &admin_token,
            &format!("/tasks/{own_task}"),
            &json!({ "title": "Renamed", "priority": "high" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["data"]["priority"], json!("high"));

    let resp = ctx.delete(&admin_token, &format!("/tasks/{own_task}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_unassigning_a_task() {
    let ctx = TestContext::new();
    let (admin_token, _member1_token, task1, _task2) = setup(&ctx).await;

    // Explicit null clears the assignee.
    let resp = ctx
        .put(
            &admin_token,
            &format!("/tasks/{task1}"),
            &json!({ "assignedToId": null }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("body");
    assert_eq!(body["data"]["assignedToId"], json!(null));
}
