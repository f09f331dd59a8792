use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use kiddytime_api::{
    ApiState,
    middleware::{auth, error_handling::map_error},
};
use kiddytime_core::errors::AttendanceError;
use kiddytime_db::mock::{MockChildRepo, MockEntryRepo, MockUserRepo};

use crate::test_utils::{cookie_server, session_header};

#[tokio::test]
async fn test_error_handling_not_found() {
    let response = map_error(AttendanceError::NotFound("Child c1 not found".to_string()));
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_handling_validation() {
    let response = map_error(AttendanceError::Validation("Missing data".to_string()));
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_error_handling_authentication() {
    let response = map_error(AttendanceError::Authentication("Incorrect password".to_string()));
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_error_handling_storage() {
    let response = map_error(AttendanceError::Storage(eyre::eyre!("entries.json is corrupt")));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_error_handling_internal() {
    let response = map_error(AttendanceError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    ))));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_hash_and_verify_password() {
    let hashed = auth::hash_password("test_password").unwrap();

    assert_ne!(hashed, "test_password");
    assert!(hashed.starts_with("$argon2"));
    assert!(auth::verify_password("test_password", &hashed));
    assert!(!auth::verify_password("wrong_password", &hashed));
    assert!(!auth::verify_password("test_password", "not-a-phc-hash"));
}

fn mocked_state(users: MockUserRepo, children: MockChildRepo, entries: MockEntryRepo) -> Arc<ApiState> {
    Arc::new(ApiState::new(
        Arc::new(users),
        Arc::new(children),
        Arc::new(entries),
        chrono::Duration::hours(24),
    ))
}

#[tokio::test]
async fn test_storage_failure_returns_generic_500() {
    let mut entries = MockEntryRepo::new();
    entries
        .expect_find_by_date_range()
        .returning(|_, _| Err(eyre::eyre!("entries.json is not valid JSON")));
    let state = mocked_state(MockUserRepo::new(), MockChildRepo::new(), entries);
    let token = state.sessions.create("u1").await;
    let server = cookie_server(state);

    let (name, value) = session_header(&token);
    let response = server
        .get("/api/entries?startDate=2024-01-01&endDate=2024-01-07")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Internal server error" })
    );
}

#[tokio::test]
async fn test_has_password_reads_user_repository() {
    let mut users = MockUserRepo::new();
    users.expect_all().times(1).returning(|| Ok(Vec::new()));
    let server = cookie_server(mocked_state(users, MockChildRepo::new(), MockEntryRepo::new()));

    let body = server.get("/api/auth/has-password").await.json::<Value>();

    assert_eq!(body, json!({ "hasPassword": false }));
}

#[tokio::test]
async fn test_unknown_session_token_is_rejected() {
    let mut children = MockChildRepo::new();
    children.expect_all().never();
    let server = cookie_server(mocked_state(MockUserRepo::new(), children, MockEntryRepo::new()));

    let (name, value) = session_header("deadbeef");
    server
        .get("/api/children")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_setup_losing_the_race_is_rejected_without_session() {
    let mut users = MockUserRepo::new();
    users.expect_all().returning(|| Ok(Vec::new()));
    users.expect_create_if_none().times(1).returning(|_| Ok(None));
    users.expect_create().never();
    let state = mocked_state(users, MockChildRepo::new(), MockEntryRepo::new());
    let server = cookie_server(state.clone());

    let response = server
        .post("/api/auth/setup")
        .json(&json!({ "password": "secret" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "A user already exists" })
    );
    assert_eq!(state.sessions.len().await, 0);
}
