use std::sync::Arc;

use axum::{Router, routing::get};

use crate::{ApiState, handlers::children};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/children",
            get(children::list_children).post(children::create_child),
        )
        .route(
            "/api/children/:id",
            get(children::get_child)
                .put(children::update_child)
                .delete(children::delete_child),
        )
}
