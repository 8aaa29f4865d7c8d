//! Integration tests for Taskdeck.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, run migrations, start the server
//! cargo run -p taskdeck-cli -- migrate
//! cargo run -p taskdeck-server
//!
//! # Run integration tests against it
//! cargo test -p taskdeck-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a running server over HTTP (`TASKDECK_BASE_URL`, default
//! `http://localhost:8080`). Each test registers its own tenant under a
//! unique subdomain, so tests are independent and re-runnable against the
//! same database.

use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Password used for every account the tests create.
pub const TEST_PASSWORD: &str = "Testing#12345";

/// Test context: an HTTP client pointed at the server under test.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Create a context from `TASKDECK_BASE_URL` (default localhost:8080).
    #[must_use]
    pub fn new() -> Self {
        let base_url = std::env::var("TASKDECK_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Register a tenant and return `(subdomain, admin token, response data)`.
    ///
    /// The subdomain is freshly generated, the admin email derived from it,
    /// and the admin is logged in before returning.
    pub async fn register_tenant(&self) -> (String, String, Value) {
        let subdomain = unique_subdomain();
        let admin_email = format!("admin@{subdomain}.example.com");

        let resp = self
            .client
            .post(format!("{}/auth/register-tenant", self.base_url))
            .json(&json!({
                "tenantName": format!("Tenant {subdomain}"),
                "subdomain": subdomain,
                "adminEmail": admin_email,
                "adminPassword": TEST_PASSWORD,
                "adminFullName": "Test Admin",
            }))
            .send()
            .await
            .expect("register-tenant request failed");

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.expect("register-tenant body");
        assert_eq!(body["success"], json!(true));

        let token = self
            .login(&admin_email, TEST_PASSWORD, Some(&subdomain))
            .await
            .expect("admin login after registration");

        (subdomain, token, body["data"].clone())
    }

    /// Login; returns the token on 200, `None` otherwise.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        subdomain: Option<&str>,
    ) -> Option<String> {
        let mut payload = json!({ "email": email, "password": password });
        if let Some(subdomain) = subdomain {
            payload["tenantSubdomain"] = json!(subdomain);
        }

        let resp = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .json(&payload)
            .send()
            .await
            .expect("login request failed");

        if resp.status() != StatusCode::OK {
            return None;
        }

        let body: Value = resp.json().await.expect("login body");
        Some(
            body["data"]["token"]
                .as_str()
                .expect("token in login response")
                .to_string(),
        )
    }

    /// Raw login response, for asserting on failure statuses.
    pub async fn login_response(
        &self,
        email: &str,
        password: &str,
        subdomain: Option<&str>,
    ) -> Response {
        let mut payload = json!({ "email": email, "password": password });
        if let Some(subdomain) = subdomain {
            payload["tenantSubdomain"] = json!(subdomain);
        }

        self.client
            .post(format!("{}/auth/login", self.base_url))
            .json(&payload)
            .send()
            .await
            .expect("login request failed")
    }

    /// Authenticated GET.
    pub async fn get(&self, token: &str, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .expect("GET request failed")
    }

    /// Authenticated POST with a JSON body.
    pub async fn post(&self, token: &str, path: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Authenticated PUT with a JSON body.
    pub async fn put(&self, token: &str, path: &str, body: &Value) -> Response {
        self.client
            .put(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("PUT request failed")
    }

    /// Authenticated PATCH with a JSON body.
    pub async fn patch(&self, token: &str, path: &str, body: &Value) -> Response {
        self.client
            .patch(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("PATCH request failed")
    }

    /// Authenticated DELETE.
    pub async fn delete(&self, token: &str, path: &str) -> Response {
        self.client
            .delete(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .expect("DELETE request failed")
    }

    /// Create a project and return its ID.
    pub async fn create_project(&self, token: &str, name: &str) -> String {
        let resp = self
            .post(token, "/projects", &json!({ "name": name }))
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.expect("project body");
        body["data"]["id"]
            .as_str()
            .expect("project id")
            .to_string()
    }

    /// Create a user in the caller's tenant and return its ID.
    pub async fn create_user(&self, token: &str, email: &str, role: &str) -> String {
        let resp = self
            .post(
                token,
                "/users",
                &json!({
                    "email": email,
                    "password": TEST_PASSWORD,
                    "fullName": "Test User",
                    "role": role,
                }),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.expect("user body");
        body["data"]["id"].as_str().expect("user id").to_string()
    }
}

/// A fresh, valid subdomain for this test run.
#[must_use]
pub fn unique_subdomain() -> String {
    format!("t-{}", Uuid::new_v4().simple())
}
