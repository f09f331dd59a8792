use std::sync::Arc;

use axum::{Router, routing::get};

use crate::{ApiState, handlers::entries};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/entries",
            get(entries::list_entries).post(entries::save_entry),
        )
        .route(
            "/api/entries/:child_id/:date",
            get(entries::get_entry).put(entries::update_entry),
        )
}
