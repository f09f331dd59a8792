//! # Legacy Migration
//!
//! Early versions stored one flat arrival/leaving pair per entry and a
//! bare name plus default times per child. These helpers upgrade such raw
//! JSON records to the segmented schema, filling new fields with safe
//! defaults. Records already in the current shape pass through unchanged.

use serde_json::{json, Map, Value};

use crate::models::{
    child::{Child, DEFAULT_ARRIVAL_TIME, DEFAULT_EXPECTED_DAYS, DEFAULT_LEAVING_TIME},
    entry::{entry_id, TimeEntry},
};

fn non_empty_str<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn is_legacy_entry(record: &Value) -> bool {
    record.get("arrivalTime").is_some() && record.get("segments").is_none()
}

fn is_legacy_child(record: &Value) -> bool {
    record.get("name").is_some_and(|n| !n.is_null()) && record.get("hasMeal").is_none()
}

/// True if any record of the collection still has a legacy shape.
pub fn needs_migration(records: &[Value]) -> bool {
    records
        .iter()
        .any(|record| is_legacy_entry(record) || is_legacy_child(record))
}

/// Upgrades one raw entry record.
pub fn migrate_time_entry(record: Value) -> serde_json::Result<TimeEntry> {
    if record.get("segments").is_some_and(Value::is_array) {
        return serde_json::from_value(record);
    }

    let Value::Object(legacy) = record else {
        return serde_json::from_value(record);
    };

    let mut upgraded = json!({
        "childId": legacy.get("childId").cloned().unwrap_or(Value::Null),
        "date": legacy.get("date").cloned().unwrap_or(Value::Null),
        "segments": [{
            "id": "1",
            "arrivalTime": non_empty_str(&legacy, "arrivalTime"),
            "leavingTime": non_empty_str(&legacy, "leavingTime"),
        }],
        "isAbsent": false,
        "hasMeal": null,
        "hasSnack": null,
        "notes": non_empty_str(&legacy, "notes").unwrap_or_default(),
    });
    if let Some(id) = non_empty_str(&legacy, "id") {
        upgraded["id"] = Value::String(id.to_string());
    }
    if let Some(updated_at) = legacy.get("updatedAt") {
        upgraded["updatedAt"] = updated_at.clone();
    }

    let mut entry: TimeEntry = serde_json::from_value(upgraded)?;
    if entry.id.is_empty() {
        entry.id = entry_id(&entry.child_id, entry.date);
    }
    Ok(entry)
}

/// Upgrades one raw child record, backfilling every newer field.
pub fn migrate_child(record: Value) -> serde_json::Result<Child> {
    let Value::Object(mut child) = record else {
        return serde_json::from_value(record);
    };

    child.entry("hasMeal").or_insert(Value::Bool(true));
    child.entry("hasSnack").or_insert(Value::Bool(true));
    child
        .entry("expectedDays")
        .or_insert_with(|| json!(DEFAULT_EXPECTED_DAYS));
    child.entry("absentDays").or_insert_with(|| json!([]));

    let arrival = non_empty_str(&child, "defaultArrivalTime")
        .unwrap_or(DEFAULT_ARRIVAL_TIME)
        .to_string();
    let leaving = non_empty_str(&child, "defaultLeavingTime")
        .unwrap_or(DEFAULT_LEAVING_TIME)
        .to_string();
    child.insert("defaultArrivalTime".into(), Value::String(arrival.clone()));
    child.insert("defaultLeavingTime".into(), Value::String(leaving.clone()));

    let has_segments = child
        .get("defaultSegments")
        .and_then(Value::as_array)
        .is_some_and(|segments| !segments.is_empty());
    if !has_segments {
        let days = child.get("expectedDays").cloned().unwrap_or(Value::Null);
        child.insert(
            "defaultSegments".into(),
            json!([{
                "id": "1",
                "arrivalTime": arrival,
                "leavingTime": leaving,
                "days": days,
            }]),
        );
    }

    serde_json::from_value(Value::Object(child))
}

pub fn migrate_entries(records: Vec<Value>) -> serde_json::Result<Vec<TimeEntry>> {
    records.into_iter().map(migrate_time_entry).collect()
}

pub fn migrate_children(records: Vec<Value>) -> serde_json::Result<Vec<Child>> {
    records.into_iter().map(migrate_child).collect()
}
