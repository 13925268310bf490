//! Integration tests for campaign CRUD and ownership enforcement.
//!
//! Run with a live server: `cargo test -p crowdlocal-integration-tests -- --ignored`

use crowdlocal_integration_tests::{TestClient, decimal_field};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_create_then_get_has_zero_funding_and_active_status() {
    let ctx = TestClient::new();
    let (token, user) = ctx.signup_random("Founder").await;

    let project = ctx.create_project(&token, "Create Then Get").await;
    let id = project["id"].as_str().unwrap();

    let fetched = ctx.get_project(id).await;
    assert_eq!(decimal_field(&fetched["currentFunding"]), Decimal::ZERO);
    assert_eq!(fetched["status"], "active");
    assert_eq!(fetched["founder"]["id"], user["id"]);
    assert!(fetched["contributors"].as_array().unwrap().is_empty());

    // The founder's own view lists the new campaign.
    let me = ctx.me(&token).await;
    assert!(
        me["createdProjects"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p == &fetched["id"])
    );
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_create_requires_auth() {
    let ctx = TestClient::new();
    let resp = ctx
        .client
        .post(format!("{}/api/projects", ctx.base_url))
        .json(&json!({
            "title": "No Auth",
            "tagline": "t",
            "description": "d",
            "goal": 1000,
            "daysRemaining": 10,
            "category": "Tech",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_create_missing_fields_is_400() {
    let ctx = TestClient::new();
    let (token, _) = ctx.signup_random("Founder").await;

    let resp = ctx
        .client
        .post(format!("{}/api/projects", ctx.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "Only A Title" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_list_is_newest_first() {
    let ctx = TestClient::new();
    let (token, _) = ctx.signup_random("Founder").await;

    let older = ctx.create_project(&token, "Older Campaign").await;
    let newer = ctx.create_project(&token, "Newer Campaign").await;

    let resp = ctx
        .client
        .get(format!("{}/api/projects", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let list: Vec<Value> = resp.json().await.unwrap();
    let position = |needle: &Value| {
        list.iter()
            .position(|p| p["id"] == needle["id"])
            .expect("created campaign missing from list")
    };
    assert!(position(&newer) < position(&older));
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_get_unknown_project_is_404() {
    let ctx = TestClient::new();
    let resp = ctx
        .client
        .get(format!("{}/api/projects/{}", ctx.base_url, Uuid::new_v4()))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_update_by_founder_patches_only_supplied_fields() {
    let ctx = TestClient::new();
    let (token, _) = ctx.signup_random("Founder").await;
    let project = ctx.create_project(&token, "Before Update").await;
    let id = project["id"].as_str().unwrap();

    let resp = ctx
        .client
        .put(format!("{}/api/projects/{id}", ctx.base_url))
        .bearer_auth(&token)
        .json(&json!({ "title": "After Update", "daysRemaining": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let updated = ctx.get_project(id).await;
    assert_eq!(updated["title"], "After Update");
    // Zero is a present value, applied; absent fields kept their values.
    assert_eq!(updated["daysRemaining"], 0);
    assert_eq!(updated["tagline"], project["tagline"]);
    assert_eq!(updated["description"], project["description"]);
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_update_by_non_founder_is_forbidden_and_changes_nothing() {
    let ctx = TestClient::new();
    let (founder_token, _) = ctx.signup_random("Founder").await;
    let (intruder_token, _) = ctx.signup_random("Intruder").await;

    let project = ctx.create_project(&founder_token, "Owned Campaign").await;
    let id = project["id"].as_str().unwrap();

    let resp = ctx
        .client
        .put(format!("{}/api/projects/{id}", ctx.base_url))
        .bearer_auth(&intruder_token)
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let unchanged = ctx.get_project(id).await;
    assert_eq!(unchanged["title"], "Owned Campaign");
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_delete_by_non_founder_is_forbidden() {
    let ctx = TestClient::new();
    let (founder_token, _) = ctx.signup_random("Founder").await;
    let (intruder_token, _) = ctx.signup_random("Intruder").await;

    let project = ctx.create_project(&founder_token, "Keep Me").await;
    let id = project["id"].as_str().unwrap();

    let resp = ctx
        .client
        .delete(format!("{}/api/projects/{id}", ctx.base_url))
        .bearer_auth(&intruder_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Still there.
    ctx.get_project(id).await;
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_delete_by_founder_removes_project_and_membership() {
    let ctx = TestClient::new();
    let (token, _) = ctx.signup_random("Founder").await;
    let project = ctx.create_project(&token, "Short Lived").await;
    let id = project["id"].as_str().unwrap();

    let resp = ctx
        .client
        .delete(format!("{}/api/projects/{id}", ctx.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let gone = ctx
        .client
        .get(format!("{}/api/projects/{id}", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    // Cascades out of the founder's created set.
    let me = ctx.me(&token).await;
    assert!(
        !me["createdProjects"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p == &project["id"])
    );
}
