use std::sync::Arc;

use axum::{Router, routing::get};

use crate::{ApiState, handlers::export};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/export/entries", get(export::export_entries))
        .route("/api/export/children", get(export::export_children))
}
