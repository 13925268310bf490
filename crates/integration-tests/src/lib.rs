//! Integration tests for CrowdLocal.
//!
//! These tests drive a running API server over HTTP; they are `#[ignore]`d
//! by default and need:
//! - A running `PostgreSQL` database with migrations applied
//!   (`cargo run -p crowdlocal-cli -- migrate`)
//! - The API server running (`cargo run -p crowdlocal-api`)
//!
//! Run with:
//! ```bash
//! cargo test -p crowdlocal-integration-tests -- --ignored --test-threads=1
//! ```
//!
//! Single-threaded so the suite's signups stay inside the auth rate limit.
//!
//! Each test registers fresh users with random emails, so tests do not
//! interfere with each other or require database resets between runs.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CROWDLOCAL_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A thin client around reqwest for driving the API in tests.
pub struct TestClient {
    pub client: Client,
    pub base_url: String,
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClient {
    /// Create a client pointed at the configured server.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url(),
        }
    }

    /// Sign up a fresh user with a random email; returns (token, user view).
    ///
    /// # Panics
    ///
    /// Panics if the signup request fails.
    pub async fn signup_random(&self, name: &str) -> (String, Value) {
        let email = format!("{}@integration.test", Uuid::new_v4());
        let resp = self
            .client
            .post(format!("{}/api/auth/signup", self.base_url))
            .json(&json!({
                "name": name,
                "email": email,
                "password": "integration-password",
            }))
            .send()
            .await
            .expect("signup request failed");

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.expect("signup response not JSON");
        let token = body["token"].as_str().expect("token missing").to_owned();
        (token, body["user"].clone())
    }

    /// Create a valid campaign as the given user; returns the project JSON.
    ///
    /// # Panics
    ///
    /// Panics if the create request fails.
    pub async fn create_project(&self, token: &str, title: &str) -> Value {
        let resp = self
            .client
            .post(format!("{}/api/projects", self.base_url))
            .bearer_auth(token)
            .json(&json!({
                "title": title,
                "tagline": "A tagline",
                "description": "A longer description of the campaign.",
                "goal": 50_000,
                "daysRemaining": 30,
                "category": "Tech",
            }))
            .send()
            .await
            .expect("create project request failed");

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.expect("create response not JSON");
        body["project"].clone()
    }

    /// Fund a project; returns the raw response for status assertions.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn fund(&self, token: &str, project_id: &str, amount: i64) -> reqwest::Response {
        self.client
            .post(format!("{}/api/projects/{project_id}/fund", self.base_url))
            .bearer_auth(token)
            .json(&json!({ "amount": amount }))
            .send()
            .await
            .expect("fund request failed")
    }

    /// Fetch a project's detail view.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the project is missing.
    pub async fn get_project(&self, project_id: &str) -> Value {
        let resp = self
            .client
            .get(format!("{}/api/projects/{project_id}", self.base_url))
            .send()
            .await
            .expect("get project request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.expect("project response not JSON")
    }

    /// Fetch the authenticated user's own view.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn me(&self, token: &str) -> Value {
        let resp = self
            .client
            .get(format!("{}/api/auth/me", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .expect("me request failed");
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.expect("me response not JSON")
    }
}

/// Parse a decimal field that the API serializes as a string.
///
/// # Panics
///
/// Panics if the field is neither a decimal string nor a number.
#[must_use]
pub fn decimal_field(value: &Value) -> rust_decimal::Decimal {
    match value {
        Value::String(s) => s.parse().expect("invalid decimal string"),
        Value::Number(n) => n.to_string().parse().expect("invalid decimal number"),
        other => panic!("expected decimal, got {other}"),
    }
}
