use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_create_and_list_children() {
    let ctx = TestContext::logged_in().await;

    let emma = ctx.create_child("Emma", &[1, 2, 3, 4, 5]).await;
    ctx.create_child("Lucas", &[1, 3]).await;

    assert!(emma["id"].is_string());
    assert_eq!(emma["defaultSegments"][0]["arrivalTime"], json!("08:00"));
    assert_eq!(emma["defaultSegments"][0]["days"], json!([1, 2, 3, 4, 5]));

    let list = ctx.server.get("/api/children").await.json::<Vec<Value>>();
    let names: Vec<_> = list.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Emma", "Lucas"]);
}

#[tokio::test]
async fn test_create_child_requires_name_and_times() {
    let ctx = TestContext::logged_in().await;

    let response = ctx
        .server
        .post("/api/children")
        .json(&json!({ "name": "Léa", "defaultArrivalTime": "09:00" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(
        response.json::<Value>()["error"]
            .as_str()
            .unwrap()
            .contains("defaultLeavingTime")
    );
}

#[tokio::test]
async fn test_get_unknown_child_is_not_found() {
    let ctx = TestContext::logged_in().await;

    let response = ctx.server.get("/api/children/missing").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_update_child_merges_fields() {
    let ctx = TestContext::logged_in().await;
    let emma = ctx.create_child("Emma", &[1, 2, 3, 4, 5]).await;
    let id = emma["id"].as_str().unwrap();

    let updated = ctx
        .server
        .put(&format!("/api/children/{}", id))
        .json(&json!({ "hasSnack": true, "expectedDays": [2, 4] }))
        .await
        .json::<Value>();

    assert_eq!(updated["name"], json!("Emma"));
    assert_eq!(updated["hasSnack"], json!(true));
    assert_eq!(updated["expectedDays"], json!([2, 4]));

    let fetched = ctx
        .server
        .get(&format!("/api/children/{}", id))
        .await
        .json::<Value>();
    assert_eq!(fetched, updated);

    ctx.server
        .put("/api/children/missing")
        .json(&json!({ "name": "Nobody" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_child_cascades_entries() {
    let ctx = TestContext::logged_in().await;
    let emma = ctx.create_child("Emma", &[1, 2, 3, 4, 5]).await;
    let lucas = ctx.create_child("Lucas", &[1, 2, 3, 4, 5]).await;
    for child in [&emma, &lucas] {
        ctx.save_entry(json!({
            "childId": child["id"],
            "date": "2024-01-02",
            "segments": [{ "id": "1", "arrivalTime": "08:00", "leavingTime": "17:00" }]
        }))
        .await;
    }

    let response = ctx
        .server
        .delete(&format!("/api/children/{}", emma["id"].as_str().unwrap()))
        .await;
    response.assert_status_ok();

    let entries = ctx
        .server
        .get("/api/entries?startDate=2024-01-01&endDate=2024-01-31")
        .await
        .json::<Vec<Value>>();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["childId"], lucas["id"]);

    ctx.server
        .delete(&format!("/api/children/{}", emma["id"].as_str().unwrap()))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
