use std::future::IntoFuture;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::TestContext;

fn entry(child_id: &str, date: &str, arrival: &str, leaving: Option<&str>) -> Value {
    json!({
        "childId": child_id,
        "date": date,
        "segments": [{ "id": "1", "arrivalTime": arrival, "leavingTime": leaving }],
        "isAbsent": false,
        "hasMeal": null,
        "hasSnack": null,
        "notes": ""
    })
}

#[tokio::test]
async fn test_save_entry_twice_keeps_one_record() {
    let ctx = TestContext::logged_in().await;

    ctx.save_entry(entry("c1", "2024-01-02", "08:00", None)).await;
    let saved = ctx
        .save_entry(entry("c1", "2024-01-02", "08:15", Some("16:30")))
        .await;

    assert_eq!(saved["id"], json!("c1-2024-01-02"));
    let all = ctx
        .server
        .get("/api/entries?startDate=2024-01-02&endDate=2024-01-02")
        .await
        .json::<Vec<Value>>();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["segments"][0]["arrivalTime"], json!("08:15"));
    assert_eq!(all[0]["segments"][0]["leavingTime"], json!("16:30"));
}

#[tokio::test]
async fn test_save_entry_requires_child_and_date() {
    let ctx = TestContext::logged_in().await;

    for body in [
        json!({ "date": "2024-01-02", "segments": [] }),
        json!({ "childId": "c1", "segments": [] }),
    ] {
        let response = ctx.server.post("/api/entries").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }
}

#[tokio::test]
async fn test_list_entries_requires_both_bounds() {
    let ctx = TestContext::logged_in().await;

    ctx.server
        .get("/api/entries?startDate=2024-01-01")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    ctx.server
        .get("/api/entries")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_entries_is_inclusive() {
    let ctx = TestContext::logged_in().await;
    for date in ["2023-12-31", "2024-01-01", "2024-01-07", "2024-01-08"] {
        ctx.save_entry(entry("c1", date, "08:00", Some("12:00"))).await;
    }

    let week = ctx
        .server
        .get("/api/entries?startDate=2024-01-01&endDate=2024-01-07")
        .await
        .json::<Vec<Value>>();
    let dates: Vec<_> = week.iter().map(|e| e["date"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-07"]);
}

#[tokio::test]
async fn test_get_entry() {
    let ctx = TestContext::logged_in().await;
    ctx.save_entry(entry("c1", "2024-01-02", "08:00", None)).await;

    let found = ctx
        .server
        .get("/api/entries/c1/2024-01-02")
        .await
        .json::<Value>();
    assert_eq!(found["childId"], json!("c1"));

    ctx.server
        .get("/api/entries/c1/2024-01-03")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    ctx.server
        .get("/api/entries/c1/not-a-date")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_entry_merges_onto_existing() {
    let ctx = TestContext::logged_in().await;
    let mut original = entry("c1", "2024-01-02", "08:00", None);
    original["hasMeal"] = json!(false);
    original["notes"] = json!("arrived with a cold");
    ctx.save_entry(original).await;

    let updated = ctx
        .server
        .put("/api/entries/c1/2024-01-02")
        .json(&json!({
            "segments": [{ "id": "1", "arrivalTime": "08:00", "leavingTime": "17:00" }]
        }))
        .await
        .json::<Value>();

    assert_eq!(updated["segments"][0]["leavingTime"], json!("17:00"));
    assert_eq!(updated["hasMeal"], json!(false));
    assert_eq!(updated["notes"], json!("arrived with a cold"));
}

#[tokio::test]
async fn test_update_entry_creates_from_blank() {
    let ctx = TestContext::logged_in().await;

    let created = ctx
        .server
        .put("/api/entries/c2/2024-01-05")
        .json(&json!({ "isAbsent": true, "absenceReason": "Malade" }))
        .await
        .json::<Value>();

    assert_eq!(created["id"], json!("c2-2024-01-05"));
    assert_eq!(created["isAbsent"], json!(true));
    assert_eq!(created["absenceReason"], json!("Malade"));
    assert_eq!(created["hasMeal"], Value::Null);
}

#[tokio::test]
async fn test_entries_require_session() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .get("/api/entries?startDate=2024-01-01&endDate=2024-01-07")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_merge_both_fields() {
    let ctx = TestContext::logged_in().await;

    for day in 1..=10 {
        let url = format!("/api/entries/c1/2024-01-{:02}", day);
        let (notes, meal) = tokio::join!(
            ctx.server.put(&url).json(&json!({ "notes": "late" })).into_future(),
            ctx.server.put(&url).json(&json!({ "hasMeal": false })).into_future(),
        );
        notes.assert_status_ok();
        meal.assert_status_ok();

        let stored = ctx.server.get(&url).await.json::<Value>();
        assert_eq!(stored["notes"], json!("late"), "notes lost on {}", url);
        assert_eq!(stored["hasMeal"], json!(false), "hasMeal lost on {}", url);
    }
}
