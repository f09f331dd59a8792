use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/auth/has-password", get(handlers::auth::has_password))
        .route("/api/auth/check", get(handlers::auth::check))
        .route("/api/auth/setup", post(handlers::auth::setup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
}
