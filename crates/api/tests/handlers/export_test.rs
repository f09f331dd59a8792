use axum::http::{StatusCode, header};
use serde_json::json;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_export_entries_csv() {
    let ctx = TestContext::logged_in().await;
    let emma = ctx.create_child("Emma", &[1, 2, 3, 4, 5]).await;
    ctx.save_entry(json!({
        "childId": emma["id"],
        "date": "2024-01-02",
        "segments": [{ "id": "1", "arrivalTime": "08:00", "leavingTime": "12:30" }],
        "hasMeal": false,
        "notes": "Nap, \"long\" one"
    }))
    .await;

    let response = ctx
        .server
        .get("/api/export/entries?startDate=2024-01-01&endDate=2024-01-07")
        .await;

    response.assert_status_ok();
    let headers = response.headers();
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"presences_2024-01-01_2024-01-07.csv\""
    );

    let body = response.text();
    assert!(body.starts_with('\u{FEFF}'));
    assert!(body.contains(
        r#""02/01/2024","Emma","Left","08:00-12:30","4h30","No","No","-","Nap, ""long"" one""#
    ));
}

#[tokio::test]
async fn test_export_entries_requires_range() {
    let ctx = TestContext::logged_in().await;

    ctx.server
        .get("/api/export/entries?endDate=2024-01-07")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_children_csv() {
    let ctx = TestContext::logged_in().await;
    ctx.create_child("Léa", &[1, 2]).await;

    let response = ctx.server.get("/api/export/children").await;

    response.assert_status_ok();
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"enfants_"));
    assert!(response.text().contains(r#""Léa","08:00","17:00","Yes","No""#));
}

#[tokio::test]
async fn test_export_requires_session() {
    let ctx = TestContext::new().await;

    ctx.server
        .get("/api/export/children")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
