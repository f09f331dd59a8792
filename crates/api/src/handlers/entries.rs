use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::Utc;

use kiddytime_core::{
    errors::AttendanceError,
    models::entry::{DateRangeQuery, SaveEntryRequest, TimeEntry, UpdateEntryRequest},
};

use super::{date_param, range_params};
use crate::{
    ApiState,
    middleware::{auth::CurrentUser, error_handling::AppError},
};

pub async fn list_entries(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<TimeEntry>>, AppError> {
    let range = range_params(query.start_date.as_deref(), query.end_date.as_deref())?;
    let entries = state
        .entries
        .find_by_date_range(range.start, range.end)
        .await?;
    Ok(Json(entries))
}

pub async fn get_entry(
    State(state): State<Arc<ApiState>>,
    Path((child_id, date)): Path<(String, String)>,
) -> Result<Json<TimeEntry>, AppError> {
    let day = date_param("date", &date)?;
    let entry = state
        .entries
        .find_by_child_and_date(&child_id, day)
        .await?
        .ok_or_else(|| {
            AttendanceError::NotFound(format!("No entry for child {} on {}", child_id, date))
        })?;
    Ok(Json(entry))
}

/// Stores the full entry under its `(childId, date)` key.
pub async fn save_entry(
    State(state): State<Arc<ApiState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(payload): Json<SaveEntryRequest>,
) -> Result<Json<TimeEntry>, AppError> {
    let child_id = payload.child_id.clone().filter(|id| !id.is_empty());
    let date = payload.date.clone().filter(|d| !d.is_empty());
    let (Some(child_id), Some(date)) = (child_id, date) else {
        return Err(AppError(AttendanceError::Validation(
            "childId and date are required".to_string(),
        )));
    };
    let day = date_param("date", &date)?;

    tracing::debug!("User {} saving entry {} {}", user_id, child_id, date);
    let entry = payload.into_entry(child_id, day, Utc::now());
    Ok(Json(state.entries.upsert(entry).await?))
}

/// Merges the given fields onto the stored entry, or onto a blank one.
pub async fn update_entry(
    State(state): State<Arc<ApiState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path((child_id, date)): Path<(String, String)>,
    Json(payload): Json<UpdateEntryRequest>,
) -> Result<Json<TimeEntry>, AppError> {
    let day = date_param("date", &date)?;
    tracing::debug!("User {} updating entry {} {}", user_id, child_id, date);
    let entry = state
        .entries
        .merge(&child_id, day, payload, Utc::now())
        .await?;
    Ok(Json(entry))
}
