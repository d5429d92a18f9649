use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::database::models::{Account, AccountCreate, AccountRepository, AccountUpdate};
use crate::database::Repository;
use crate::error::ApiError;
use crate::handlers::Pagination;
use crate::state::AppState;

/// GET /api/v1/account - list accounts in the current tenant's schema.
pub async fn account_list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Account>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let accounts = AccountRepository.list(&mut conn, page.skip, page.limit).await?;
    Ok(Json(accounts))
}

/// POST /api/v1/account
pub async fn account_create(
    State(state): State<AppState>,
    Json(payload): Json<AccountCreate>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let mut conn = state.db.acquire().await?;
    let account = AccountRepository.create(&mut conn, payload).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /api/v1/account/:id
pub async fn account_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Account>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let account = AccountRepository
        .get(&mut conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Account {} not found", id)))?;
    Ok(Json(account))
}

/// PUT /api/v1/account/:id
pub async fn account_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AccountUpdate>,
) -> Result<Json<Account>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let account = AccountRepository
        .update(&mut conn, id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Account {} not found", id)))?;
    Ok(Json(account))
}

/// DELETE /api/v1/account/:id
pub async fn account_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.db.acquire().await?;
    let deleted = AccountRepository.delete(&mut conn, id).await?;
    if !deleted {
        return Err(ApiError::not_found(format!("Account {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
