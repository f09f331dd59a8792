//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and a `{"error": "..."}` body.
//! Server-side failures are logged in full but answered with a generic
//! message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use kiddytime_core::errors::AttendanceError;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use kiddytime_api::middleware::error_handling::AppError;
/// use kiddytime_core::errors::AttendanceError;
///
/// async fn handler(name: Option<String>) -> Result<Json<String>, AppError> {
///     let name = name.ok_or_else(|| AttendanceError::Validation("Missing data".into()))?;
///     Ok(Json(name))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub AttendanceError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
            AttendanceError::Validation(_) => StatusCode::BAD_REQUEST,
            AttendanceError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AttendanceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AttendanceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client.
    pub fn message(&self) -> String {
        match &self.0 {
            AttendanceError::NotFound(msg)
            | AttendanceError::Validation(msg)
            | AttendanceError::Authentication(msg) => msg.clone(),
            AttendanceError::Storage(_) | AttendanceError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({ "error": self.message() }));
        (status, body).into_response()
    }
}

/// Allows `?` on `AttendanceResult` inside handlers.
impl From<AttendanceError> for AppError {
    fn from(err: AttendanceError) -> Self {
        AppError(err)
    }
}

/// Storage calls return `eyre::Result`; failures there become 500s.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(AttendanceError::Storage(err))
    }
}

/// Maps an AttendanceError straight to a response.
pub fn map_error(err: AttendanceError) -> Response {
    AppError(err).into_response()
}
