use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Local;

use kiddytime_core::{export, models::entry::DateRangeQuery};

use super::range_params;
use crate::{ApiState, middleware::error_handling::AppError};

fn csv_download(filename: String, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

pub async fn export_entries(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Response, AppError> {
    let range = range_params(query.start_date.as_deref(), query.end_date.as_deref())?;
    let children = state.children.all().await?;
    let entries = state
        .entries
        .find_by_date_range(range.start, range.end)
        .await?;

    let body = export::attendance_csv(&children, &entries)?;
    Ok(csv_download(export::attendance_filename(&range), body))
}

pub async fn export_children(State(state): State<Arc<ApiState>>) -> Result<Response, AppError> {
    let children = state.children.all().await?;
    let body = export::children_csv(&children)?;
    Ok(csv_download(
        export::children_filename(Local::now().date_naive()),
        body,
    ))
}
