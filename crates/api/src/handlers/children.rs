use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use kiddytime_core::{
    errors::AttendanceError,
    models::{
        auth::MessageResponse,
        child::{Child, CreateChildRequest, UpdateChildRequest},
    },
};
use kiddytime_db::repositories::delete_child_cascade;

use crate::{
    ApiState,
    middleware::{auth::CurrentUser, error_handling::AppError},
};

fn child_not_found(id: &str) -> AttendanceError {
    AttendanceError::NotFound(format!("Child {} not found", id))
}

pub async fn list_children(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Child>>, AppError> {
    Ok(Json(state.children.all().await?))
}

pub async fn get_child(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Child>, AppError> {
    let child = state
        .children
        .find_by_id(&id)
        .await?
        .ok_or_else(|| child_not_found(&id))?;
    Ok(Json(child))
}

pub async fn create_child(
    State(state): State<Arc<ApiState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(payload): Json<CreateChildRequest>,
) -> Result<(StatusCode, Json<Child>), AppError> {
    let child = payload
        .into_child(Uuid::new_v4().to_string(), Utc::now())
        .map_err(|field| AttendanceError::Validation(format!("Missing data: {}", field)))?;

    if state.children.find_by_id(&child.id).await?.is_some() {
        return Err(AppError(AttendanceError::Validation(format!(
            "Child {} already exists",
            child.id
        ))));
    }

    let child = state.children.create(child).await?;
    tracing::info!("User {} created child {}", user_id, child.id);
    Ok((StatusCode::CREATED, Json(child)))
}

pub async fn update_child(
    State(state): State<Arc<ApiState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateChildRequest>,
) -> Result<Json<Child>, AppError> {
    let child = state
        .children
        .update(&id, payload)
        .await?
        .ok_or_else(|| child_not_found(&id))?;
    tracing::info!("User {} updated child {}", user_id, id);
    Ok(Json(child))
}

pub async fn delete_child(
    State(state): State<Arc<ApiState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !delete_child_cascade(state.children.as_ref(), state.entries.as_ref(), &id).await? {
        return Err(AppError(child_not_found(&id)));
    }
    tracing::info!("User {} deleted child {}", user_id, id);
    Ok(Json(MessageResponse::ok("Child deleted")))
}
