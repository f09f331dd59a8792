//! # Authentication Module
//!
//! Password hashing for the administrator account and the session gate
//! placed in front of the children and entries routes.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use eyre::Result;

use kiddytime_core::errors::AttendanceError;

use crate::{ApiState, middleware::error_handling::AppError, session::SESSION_COOKIE};

/// Hashes a password with Argon2 and a fresh random salt.
///
/// The result is a PHC string carrying the algorithm, parameters and salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a stored PHC hash. Unparseable hashes never
/// match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::warn!("Stored password hash is not a PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Id of the administrator behind the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Rejects requests without a live session with 401.
pub async fn require_session(
    State(state): State<Arc<ApiState>>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = session_token(&jar) else {
        return Err(AppError(AttendanceError::Authentication(
            "Not authenticated".to_string(),
        )));
    };
    let Some(user_id) = state.sessions.user_id(&token).await else {
        return Err(AppError(AttendanceError::Authentication(
            "Session expired".to_string(),
        )));
    };

    request.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(request).await)
}
