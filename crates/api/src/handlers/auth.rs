use std::sync::Arc;

use axum::{Json, extract::State};
use axum_extra::extract::{CookieJar, cookie::Cookie};
use chrono::Utc;
use uuid::Uuid;

use kiddytime_core::{
    errors::AttendanceError,
    models::auth::{
        ADMIN_USERNAME, AuthCheckResponse, HasPasswordResponse, MIN_PASSWORD_LEN, MessageResponse,
        PasswordRequest, User,
    },
};

use crate::{
    ApiState,
    middleware::{
        auth::{hash_password, session_cookie, session_token, verify_password},
        error_handling::AppError,
    },
    session::SESSION_COOKIE,
};

pub async fn has_password(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<HasPasswordResponse>, AppError> {
    let users = state.users.all().await?;
    Ok(Json(HasPasswordResponse {
        has_password: !users.is_empty(),
    }))
}

pub async fn check(State(state): State<Arc<ApiState>>, jar: CookieJar) -> Json<AuthCheckResponse> {
    let user_id = match session_token(&jar) {
        Some(token) => state.sessions.user_id(&token).await,
        None => None,
    };
    Json(AuthCheckResponse {
        is_authenticated: user_id.is_some(),
        user_id,
    })
}

fn user_exists() -> AttendanceError {
    AttendanceError::Validation("A user already exists".to_string())
}

/// First-time setup: creates the administrator and logs them in.
pub async fn setup(
    State(state): State<Arc<ApiState>>,
    jar: CookieJar,
    Json(payload): Json<PasswordRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let password = payload
        .password
        .filter(|p| p.chars().count() >= MIN_PASSWORD_LEN)
        .ok_or_else(|| {
            AttendanceError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ))
        })?;

    if !state.users.all().await?.is_empty() {
        return Err(AppError(user_exists()));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: ADMIN_USERNAME.to_string(),
        password_hash: hash_password(&password)?,
        created_at: Utc::now(),
    };
    // a concurrent setup may have won since the check above
    let Some(user) = state.users.create_if_none(user).await? else {
        return Err(AppError(user_exists()));
    };
    tracing::info!("Administrator account created");

    let token = state.sessions.create(&user.id).await;
    let jar = jar.add(session_cookie(token, state.cookie_secure));
    Ok((jar, Json(MessageResponse::ok("Password created"))))
}

pub async fn login(
    State(state): State<Arc<ApiState>>,
    jar: CookieJar,
    Json(payload): Json<PasswordRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AttendanceError::Validation("Password required".to_string()))?;

    let user = state
        .users
        .find_by_username(ADMIN_USERNAME)
        .await?
        .ok_or_else(|| AttendanceError::Validation("No user configured".to_string()))?;

    if !verify_password(&password, &user.password_hash) {
        tracing::warn!("Rejected login attempt");
        return Err(AppError(AttendanceError::Authentication(
            "Incorrect password".to_string(),
        )));
    }

    let token = state.sessions.create(&user.id).await;
    let jar = jar.add(session_cookie(token, state.cookie_secure));
    Ok((jar, Json(MessageResponse::ok("Logged in"))))
}

pub async fn logout(
    State(state): State<Arc<ApiState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(token) = session_token(&jar) {
        state.sessions.destroy(&token).await;
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(MessageResponse::ok("Logged out")))
}
