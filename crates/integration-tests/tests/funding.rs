//! Integration tests for the funding workflow: atomicity, idempotent
//! contributor membership, and validation.
//!
//! Run with a live server: `cargo test -p crowdlocal-integration-tests -- --ignored`

use crowdlocal_integration_tests::{TestClient, decimal_field};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_fund_increases_total_and_records_contributor() {
    let ctx = TestClient::new();
    let (founder_token, _) = ctx.signup_random("Founder").await;
    let (backer_token, backer) = ctx.signup_random("Backer").await;

    let project = ctx.create_project(&founder_token, "Fund Me").await;
    let id = project["id"].as_str().unwrap();

    let resp = ctx.fund(&backer_token, id, 250).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let funded = ctx.get_project(id).await;
    assert_eq!(decimal_field(&funded["currentFunding"]), Decimal::from(250));
    let contributors = funded["contributors"].as_array().unwrap();
    assert_eq!(contributors.len(), 1);
    assert_eq!(contributors[0]["id"], backer["id"]);

    // And the backer's own view reflects the contribution.
    let me = ctx.me(&backer_token).await;
    assert!(
        me["fundedProjects"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p == &funded["id"])
    );
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_funding_twice_counts_both_amounts_but_one_membership() {
    let ctx = TestClient::new();
    let (founder_token, _) = ctx.signup_random("Founder").await;
    let (backer_token, _) = ctx.signup_random("Repeat Backer").await;

    let project = ctx.create_project(&founder_token, "Fund Twice").await;
    let id = project["id"].as_str().unwrap();

    assert_eq!(ctx.fund(&backer_token, id, 100).await.status(), StatusCode::OK);
    assert_eq!(ctx.fund(&backer_token, id, 150).await.status(), StatusCode::OK);

    let funded = ctx.get_project(id).await;
    assert_eq!(decimal_field(&funded["currentFunding"]), Decimal::from(250));
    // Exactly one membership entry regardless of contribution count.
    assert_eq!(funded["contributors"].as_array().unwrap().len(), 1);

    let me = ctx.me(&backer_token).await;
    let funded_ids = me["fundedProjects"].as_array().unwrap();
    assert_eq!(
        funded_ids.iter().filter(|p| *p == &funded["id"]).count(),
        1
    );
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_concurrent_funding_never_loses_updates() {
    const BACKERS: usize = 8;
    const AMOUNT: i64 = 25;

    let ctx = TestClient::new();
    let (founder_token, _) = ctx.signup_random("Founder").await;
    let project = ctx.create_project(&founder_token, "Concurrent Fund").await;
    let id = project["id"].as_str().unwrap().to_owned();

    let mut tokens = Vec::with_capacity(BACKERS);
    for i in 0..BACKERS {
        let (token, _) = ctx.signup_random(&format!("Backer {i}")).await;
        tokens.push(token);
    }

    // Fire all contributions at once; the atomic increment must serialize
    // them without losing any.
    let mut handles = Vec::with_capacity(BACKERS);
    for token in tokens {
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            let ctx = TestClient::new();
            ctx.fund(&token, &id, AMOUNT).await.status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let funded = ctx.get_project(&id).await;
    let expected = Decimal::from(AMOUNT * i64::try_from(BACKERS).unwrap());
    assert_eq!(decimal_field(&funded["currentFunding"]), expected);
    assert_eq!(funded["contributors"].as_array().unwrap().len(), BACKERS);
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_fund_zero_or_negative_is_rejected_and_changes_nothing() {
    let ctx = TestClient::new();
    let (founder_token, _) = ctx.signup_random("Founder").await;
    let (backer_token, _) = ctx.signup_random("Backer").await;

    let project = ctx.create_project(&founder_token, "Validation Fund").await;
    let id = project["id"].as_str().unwrap();

    for amount in [0, -50] {
        let resp = ctx.fund(&backer_token, id, amount).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    let missing_amount = ctx
        .client
        .post(format!("{}/api/projects/{id}/fund", ctx.base_url))
        .bearer_auth(&backer_token)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_amount.status(), StatusCode::BAD_REQUEST);

    let untouched = ctx.get_project(id).await;
    assert_eq!(decimal_field(&untouched["currentFunding"]), Decimal::ZERO);
    assert!(untouched["contributors"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_fund_unknown_project_is_404() {
    let ctx = TestClient::new();
    let (token, _) = ctx.signup_random("Backer").await;

    let resp = ctx.fund(&token, &Uuid::new_v4().to_string(), 100).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_fund_requires_auth() {
    let ctx = TestClient::new();
    let (founder_token, _) = ctx.signup_random("Founder").await;
    let project = ctx.create_project(&founder_token, "Auth Fund").await;
    let id = project["id"].as_str().unwrap();

    let resp = ctx
        .client
        .post(format!("{}/api/projects/{id}/fund", ctx.base_url))
        .json(&json!({ "amount": 100 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_cancelled_project_does_not_accept_funding() {
    let ctx = TestClient::new();
    let (founder_token, _) = ctx.signup_random("Founder").await;
    let (backer_token, _) = ctx.signup_random("Backer").await;

    let project = ctx.create_project(&founder_token, "Cancelled Fund").await;
    let id = project["id"].as_str().unwrap();

    let cancel = ctx
        .client
        .put(format!("{}/api/projects/{id}", ctx.base_url))
        .bearer_auth(&founder_token)
        .json(&json!({ "status": "cancelled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(cancel.status(), StatusCode::OK);

    let resp = ctx.fund(&backer_token, id, 100).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
#[ignore = "Requires a running API server and PostgreSQL"]
async fn test_overfunding_is_permitted_and_percent_clamps() {
    let ctx = TestClient::new();
    let (founder_token, _) = ctx.signup_random("Founder").await;
    let (backer_token, _) = ctx.signup_random("Generous Backer").await;

    let project = ctx.create_project(&founder_token, "Overfund Me").await;
    let id = project["id"].as_str().unwrap();

    // Goal is 50k; contribute 75k.
    let resp = ctx.fund(&backer_token, id, 75_000).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let funded = ctx.get_project(id).await;
    assert_eq!(
        decimal_field(&funded["currentFunding"]),
        Decimal::from(75_000)
    );
    assert_eq!(decimal_field(&funded["fundingPercent"]), Decimal::from(100));
}
