//! # KiddyTime API
//!
//! Web server for the childcare attendance tracker: administrator login,
//! children management, daily time entries, day rosters and CSV exports.
//!
//! ## Architecture
//!
//! - **Routes**: API endpoints and URL structure
//! - **Handlers**: request processing
//! - **Middleware**: session gate and error mapping
//! - **Session**: in-memory session store behind the cookie
//! - **Config**: environment configuration
//!
//! Storage goes through the repository traits of `kiddytime-db`, so tests
//! can run against a temporary data directory or mocks.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Authentication and error handling
pub mod middleware;
/// Route definitions
pub mod routes;
/// Cookie-backed sessions
pub mod session;

use std::{path::Path, sync::Arc, time::Duration};

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::from_fn_with_state,
};
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use kiddytime_db::{
    DataStore,
    repositories::{ChildRepository, EntryRepository, UserRepository},
};

use session::SessionStore;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub users: Arc<dyn UserRepository>,
    pub children: Arc<dyn ChildRepository>,
    pub entries: Arc<dyn EntryRepository>,
    pub sessions: SessionStore,
    /// Whether session cookies carry the `Secure` attribute
    pub cookie_secure: bool,
}

impl ApiState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        children: Arc<dyn ChildRepository>,
        entries: Arc<dyn EntryRepository>,
        session_ttl: chrono::Duration,
    ) -> Self {
        Self {
            users,
            children,
            entries,
            sessions: SessionStore::new(session_ttl),
            cookie_secure: false,
        }
    }

    pub fn from_store(store: &DataStore, config: &config::ApiConfig) -> Self {
        let mut state = Self::new(
            store.users.clone(),
            store.children.clone(),
            store.entries.clone(),
            chrono::Duration::hours(config.session_ttl_hours),
        );
        state.cookie_secure = config.cookie_secure;
        state
    }
}

/// Builds the application router.
///
/// Children, entries, roster and export routes require a session; health
/// and auth routes do not. When `static_dir` is given, every other path is
/// served from it with `index.html` as the fallback.
pub fn build_router(state: Arc<ApiState>, static_dir: Option<&Path>) -> Router {
    let protected = Router::new()
        .merge(routes::children::routes())
        .merge(routes::entries::routes())
        .merge(routes::attendance::routes())
        .merge(routes::export::routes())
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth::require_session,
        ));

    let app = Router::new()
        .merge(routes::health::routes())
        .merge(routes::auth::routes())
        .merge(protected);

    let app = match static_dir {
        Some(dir) => app.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => app,
    };

    app.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(allowed)
        .allow_credentials(true)
}

/// Starts the API server on the configured address.
///
/// Initializes logging, opens the data directory (migrating legacy files)
/// and serves until the process stops.
pub async fn start_server(config: config::ApiConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = DataStore::open(&config.data_dir).await?;
    info!("Using data directory {}", config.data_dir.display());

    let state = Arc::new(ApiState::from_store(&store, &config));
    let app = build_router(state, config.static_dir.as_deref());

    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(HandleErrorLayer::new(|_: BoxError| async {
                StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
