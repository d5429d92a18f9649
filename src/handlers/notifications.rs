use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::database::models::{
    Notification, NotificationCreate, NotificationRepository, NotificationUpdate,
};
use crate::database::Repository;
use crate::error::ApiError;
use crate::handlers::Pagination;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationListParams {
    pub account_id: Option<i64>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "Pagination::default_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct UnreadCountParams {
    pub account_id: i64,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub account_id: i64,
    pub unread: i64,
}

/// GET /api/v1/notification - list notifications, optionally filtered by
/// account.
pub async fn notification_list(
    State(state): State<AppState>,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let repo = NotificationRepository;

    let notifications = match params.account_id {
        Some(account_id) => {
            repo.list_by_account(&mut conn, account_id, params.skip, params.limit)
                .await?
        }
        None => repo.list(&mut conn, params.skip, params.limit).await?,
    };

    Ok(Json(notifications))
}

/// POST /api/v1/notification
pub async fn notification_create(
    State(state): State<AppState>,
    Json(payload): Json<NotificationCreate>,
) -> Result<(StatusCode, Json<Notification>), ApiError> {
    let mut conn = state.db.acquire().await?;
    let notification = NotificationRepository.create(&mut conn, payload).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

/// GET /api/v1/notification/unread-count?account_id=N
pub async fn notification_unread_count(
    State(state): State<AppState>,
    Query(params): Query<UnreadCountParams>,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let unread = NotificationRepository
        .unread_count(&mut conn, params.account_id)
        .await?;
    Ok(Json(UnreadCountResponse {
        account_id: params.account_id,
        unread,
    }))
}

/// GET /api/v1/notification/:id
pub async fn notification_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Notification>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let notification = NotificationRepository
        .get(&mut conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Notification {} not found", id)))?;
    Ok(Json(notification))
}

/// PUT /api/v1/notification/:id
pub async fn notification_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<NotificationUpdate>,
) -> Result<Json<Notification>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let notification = NotificationRepository
        .update(&mut conn, id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Notification {} not found", id)))?;
    Ok(Json(notification))
}

/// POST /api/v1/notification/:id/read - mark a notification as read.
pub async fn notification_mark_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Notification>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let notification = NotificationRepository
        .mark_read(&mut conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Notification {} not found", id)))?;
    Ok(Json(notification))
}

/// DELETE /api/v1/notification/:id
pub async fn notification_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.db.acquire().await?;
    let deleted = NotificationRepository.delete(&mut conn, id).await?;
    if !deleted {
        return Err(ApiError::not_found(format!("Notification {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
