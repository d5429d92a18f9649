use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;
use crate::tenant::TenantId;

#[derive(Debug, Deserialize)]
pub struct TenantCreate {
    pub tenant_id: String,
}

#[derive(Debug, Serialize)]
pub struct TenantResponse {
    pub tenant_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TenantListResponse {
    pub tenants: Vec<String>,
    pub count: usize,
}

/// POST /api/v1/tenants - provision a tenant schema with the full table set.
/// Idempotent: creating an existing tenant is a no-op.
pub async fn create_tenant(
    State(state): State<AppState>,
    Json(payload): Json<TenantCreate>,
) -> Result<(StatusCode, Json<TenantResponse>), ApiError> {
    let tenant = TenantId::new(&payload.tenant_id)?;
    state.schemas.create_namespace(&tenant).await?;

    Ok((
        StatusCode::CREATED,
        Json(TenantResponse {
            tenant_id: tenant.as_str().to_string(),
            message: format!("Tenant '{}' created successfully", tenant),
        }),
    ))
}

/// DELETE /api/v1/tenants/:tenant_id - drop a tenant schema and all its data.
/// Cascading and irreversible; access control is the caller's responsibility.
pub async fn delete_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<TenantResponse>, ApiError> {
    let tenant = TenantId::new(&tenant_id)?;
    state.schemas.drop_namespace(&tenant, true).await?;

    Ok(Json(TenantResponse {
        tenant_id: tenant.as_str().to_string(),
        message: format!("Tenant '{}' deleted successfully", tenant),
    }))
}

/// GET /api/v1/tenants - list all provisioned tenant identifiers.
pub async fn list_tenants(
    State(state): State<AppState>,
) -> Result<Json<TenantListResponse>, ApiError> {
    let tenants = state.schemas.list_namespaces().await?;

    Ok(Json(TenantListResponse {
        count: tenants.len(),
        tenants,
    }))
}
