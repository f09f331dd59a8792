use std::future::IntoFuture;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use kiddytime_db::repositories::UserRepository;

use crate::test_utils::{PASSWORD, TestContext};

#[tokio::test]
async fn test_has_password_before_and_after_setup() {
    let ctx = TestContext::new().await;

    let before = ctx.server.get("/api/auth/has-password").await.json::<Value>();
    assert_eq!(before, json!({ "hasPassword": false }));

    ctx.server
        .post("/api/auth/setup")
        .json(&json!({ "password": PASSWORD }))
        .await
        .assert_status_ok();

    let after = ctx.server.get("/api/auth/has-password").await.json::<Value>();
    assert_eq!(after, json!({ "hasPassword": true }));
}

#[tokio::test]
async fn test_setup_opens_a_session() {
    let ctx = TestContext::logged_in().await;

    let check = ctx.server.get("/api/auth/check").await.json::<Value>();
    assert_eq!(check["isAuthenticated"], json!(true));
    assert!(check["userId"].is_string());

    let stored = ctx.state.users.all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].username, "admin");
    assert_ne!(stored[0].password_hash, PASSWORD);
}

#[tokio::test]
async fn test_setup_rejects_short_password() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/auth/setup")
        .json(&json!({ "password": "abc" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
    assert!(ctx.state.users.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_second_setup_is_rejected_and_user_unchanged() {
    let ctx = TestContext::logged_in().await;
    let original = ctx.state.users.all().await.unwrap();

    let response = ctx
        .server
        .post("/api/auth/setup")
        .json(&json!({ "password": "another-password" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.state.users.all().await.unwrap(), original);
}

#[tokio::test]
async fn test_login_outcomes() {
    let ctx = TestContext::new().await;
    let client = ctx.anonymous_client();

    // no administrator yet
    client
        .post("/api/auth/login")
        .json(&json!({ "password": PASSWORD }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.server
        .post("/api/auth/setup")
        .json(&json!({ "password": PASSWORD }))
        .await
        .assert_status_ok();

    client
        .post("/api/auth/login")
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    client
        .post("/api/auth/login")
        .json(&json!({ "password": "wrong" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    client.get("/api/children").await.assert_status(StatusCode::UNAUTHORIZED);

    client
        .post("/api/auth/login")
        .json(&json!({ "password": PASSWORD }))
        .await
        .assert_status_ok();
    client.get("/api/children").await.assert_status_ok();
}

#[tokio::test]
async fn test_logout_ends_session() {
    let ctx = TestContext::logged_in().await;
    ctx.server.get("/api/children").await.assert_status_ok();

    let response = ctx.server.post("/api/auth/logout").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["success"], json!(true));

    let check = ctx.server.get("/api/auth/check").await.json::<Value>();
    assert_eq!(check, json!({ "isAuthenticated": false, "userId": null }));
    ctx.server
        .get("/api/children")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_setup_creates_one_admin() {
    let ctx = TestContext::new().await;
    let other = ctx.anonymous_client();

    let (first, second) = tokio::join!(
        ctx.server
            .post("/api/auth/setup")
            .json(&json!({ "password": "first" }))
            .into_future(),
        other
            .post("/api/auth/setup")
            .json(&json!({ "password": "second" }))
            .into_future(),
    );

    let mut statuses = vec![first.status_code().as_u16(), second.status_code().as_u16()];
    statuses.sort();
    assert_eq!(statuses, vec![200, 400]);
    assert_eq!(ctx.state.users.all().await.unwrap().len(), 1);
}
