use axum::{
    extract::State,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::config;
use crate::database::pool;
use crate::handlers::{accounts, notifications, tenants};
use crate::middleware::{resolve_tenant_middleware, security_headers_middleware};
use crate::state::AppState;

/// Assemble the application router.
///
/// Layer order matters: tenant resolution sits closest to the routes so that
/// every handler (and nothing else) runs inside a tenant scope, with tracing
/// outermost.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .merge(tenant_routes())
        .merge(account_routes())
        .merge(notification_routes())
        .with_state(state)
        .layer(axum_middleware::from_fn(resolve_tenant_middleware))
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http());

    if config().server.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

fn tenant_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/tenants",
            post(tenants::create_tenant).get(tenants::list_tenants),
        )
        .route("/api/v1/tenants/:tenant_id", delete(tenants::delete_tenant))
}

fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/account",
            get(accounts::account_list).post(accounts::account_create),
        )
        .route(
            "/api/v1/account/:id",
            get(accounts::account_get)
                .put(accounts::account_update)
                .delete(accounts::account_delete),
        )
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/notification",
            get(notifications::notification_list).post(notifications::notification_create),
        )
        .route(
            "/api/v1/notification/unread-count",
            get(notifications::notification_unread_count),
        )
        .route(
            "/api/v1/notification/:id",
            get(notifications::notification_get)
                .put(notifications::notification_update)
                .delete(notifications::notification_delete),
        )
        .route(
            "/api/v1/notification/:id/read",
            post(notifications::notification_mark_read),
        )
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match pool::health_check(state.db.pool()).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
