use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::TestContext;

fn card_names(view: &Value) -> Vec<String> {
    view["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["childName"].as_str().unwrap().to_string())
        .collect()
}

// 2024-01-03 is a Wednesday
#[tokio::test]
async fn test_day_roster_visibility() {
    let ctx = TestContext::logged_in().await;
    let present = ctx.create_child("Emma", &[3]).await;
    ctx.create_child("Lucas", &[3]).await;
    let drop_in = ctx.create_child("Léa", &[1]).await;
    ctx.create_child("Noé", &[1]).await;

    for (child, arrival) in [(&present, "08:00"), (&drop_in, "14:00")] {
        ctx.save_entry(json!({
            "childId": child["id"],
            "date": "2024-01-03",
            "segments": [{ "id": "1", "arrivalTime": arrival, "leavingTime": null }]
        }))
        .await;
    }

    let default_view = ctx
        .server
        .get("/api/attendance/2024-01-03")
        .await
        .json::<Value>();
    assert_eq!(card_names(&default_view), vec!["Emma", "Léa"]);
    assert_eq!(default_view["revealable"], json!(1));

    let all = ctx
        .server
        .get("/api/attendance/2024-01-03?showAll=true")
        .await
        .json::<Value>();
    assert_eq!(card_names(&all), vec!["Emma", "Lucas", "Léa"]);
    assert_eq!(all["cards"][1]["expected"], json!(true));
    assert_eq!(all["cards"][2]["expected"], json!(false));
}

#[tokio::test]
async fn test_day_roster_hidden_children() {
    let ctx = TestContext::logged_in().await;
    let emma = ctx.create_child("Emma", &[3]).await;
    ctx.save_entry(json!({
        "childId": emma["id"],
        "date": "2024-01-03",
        "segments": [{ "id": "1", "arrivalTime": "11:00", "leavingTime": "14:00" }]
    }))
    .await;

    let url = format!(
        "/api/attendance/2024-01-03?hidden={}",
        emma["id"].as_str().unwrap()
    );
    let view = ctx.server.get(&url).await.json::<Value>();

    assert!(card_names(&view).is_empty());
    assert_eq!(view["hidden"], json!([emma["id"]]));

    let shown = ctx
        .server
        .get("/api/attendance/2024-01-03")
        .await
        .json::<Value>();
    assert_eq!(shown["cards"][0]["hasMeal"], json!(true));
    assert_eq!(shown["cards"][0]["duration"], json!("3h00"));
}
