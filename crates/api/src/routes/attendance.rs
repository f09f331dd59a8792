use std::sync::Arc;

use axum::{Router, routing::get};

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route("/api/attendance/:date", get(handlers::attendance::day_roster))
}
