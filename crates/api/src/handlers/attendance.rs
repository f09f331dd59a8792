use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use kiddytime_core::roster::{DayRoster, RosterView};

use super::date_param;
use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterQuery {
    #[serde(default)]
    pub show_all: bool,
    /// Comma-separated child ids hidden from the day view.
    pub hidden: Option<String>,
}

impl RosterQuery {
    fn hidden_ids(&self) -> Vec<String> {
        self.hidden
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Day roster: expected and unexpected children with their cards.
pub async fn day_roster(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<String>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<RosterView>, AppError> {
    let day = date_param("date", &date)?;
    let children = state.children.all().await?;
    let entries = state.entries.find_by_date_range(day, day).await?;

    let roster = DayRoster::build(day, &children, &entries)
        .with_show_all(query.show_all)
        .with_hidden(query.hidden_ids());
    Ok(Json(roster.view()))
}
