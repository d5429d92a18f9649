// Router-level tests for tenant resolution. No database required: the
// middleware only touches request metadata and the task-local context.

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use tokio::sync::Barrier;
use tower::ServiceExt;

use tenancy_api::middleware::resolve_tenant_middleware;
use tenancy_api::tenant::TenantContext;

fn test_app() -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route("/health", get(|| async { "ok" }))
        .layer(middleware::from_fn(resolve_tenant_middleware))
}

async fn whoami() -> String {
    TenantContext::get()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "unset".to_string())
}

fn request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn request_with_tenant(uri: &str, tenant: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-tenant-id", tenant)
        .body(Body::empty())
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn missing_tenant_is_rejected_with_400() {
    let response = test_app().oneshot(request("/whoami")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value =
        serde_json::from_str(&body_string(response).await).expect("error body should be JSON");
    let detail = body["detail"].as_str().expect("detail field");
    assert!(detail.contains("x-tenant-id"), "detail names the header");
    assert!(detail.contains("tenantId"), "detail names the query param");
}

#[tokio::test]
async fn header_source_sets_context_for_request_duration() {
    let response = test_app()
        .oneshot(request_with_tenant("/whoami", "acme_corp"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "acme_corp");
}

#[tokio::test]
async fn query_param_is_used_as_fallback() {
    let response = test_app()
        .oneshot(request("/whoami?tenantId=acme"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "acme");
}

#[tokio::test]
async fn percent_encoded_query_param_is_decoded_before_validation() {
    let response = test_app()
        .oneshot(request("/whoami?tenantId=acme%5Fcorp"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "acme_corp");

    // Decoding must not smuggle invalid characters past validation
    let response = test_app()
        .oneshot(request("/whoami?tenantId=acme%2Dcorp"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn header_takes_precedence_over_query_param() {
    let response = test_app()
        .oneshot(request_with_tenant("/whoami?tenantId=from_query", "from_header"))
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "from_header");
}

#[tokio::test]
async fn invalid_identifier_is_rejected_before_handler_runs() {
    let invoked = Arc::new(Mutex::new(false));
    let flag = invoked.clone();
    let app = Router::new()
        .route(
            "/whoami",
            get(move || {
                let flag = flag.clone();
                async move {
                    *flag.lock().unwrap() = true;
                    "reached"
                }
            }),
        )
        .layer(middleware::from_fn(resolve_tenant_middleware));

    let overlong = "x".repeat(51);
    for bad in ["acme-corp", "acme corp", "a/b", overlong.as_str(), ""] {
        let req = Request::builder()
            .uri("/whoami")
            .header("x-tenant-id", bad)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "identifier {:?} should be rejected",
            bad
        );
    }

    assert!(!*invoked.lock().unwrap(), "handler must not run on rejection");
}

#[tokio::test]
async fn allowlisted_path_passes_through_without_tenant() {
    let response = test_app().oneshot(request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn context_is_cleared_after_each_request() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(request_with_tenant("/whoami", "first_tenant"))
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "first_tenant");
    assert_eq!(TenantContext::get(), None);

    // A follow-up request without a tenant must not inherit the previous one
    let response = app.oneshot(request("/whoami")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn concurrent_requests_never_observe_each_other() {
    let barrier = Arc::new(Barrier::new(2));
    let handler_barrier = barrier.clone();

    let app = Router::new()
        .route(
            "/whoami",
            get(move || {
                let barrier = handler_barrier.clone();
                async move {
                    let before = TenantContext::get().map(|t| t.to_string());
                    // Hold both requests in flight at the same time
                    barrier.wait().await;
                    let after = TenantContext::get().map(|t| t.to_string());
                    assert_eq!(before, after, "context changed mid-request");
                    after.unwrap_or_else(|| "unset".to_string())
                }
            }),
        )
        .layer(middleware::from_fn(resolve_tenant_middleware));

    let (a, b) = tokio::join!(
        app.clone().oneshot(request_with_tenant("/whoami", "tenant_a")),
        app.clone().oneshot(request_with_tenant("/whoami", "tenant_b")),
    );

    assert_eq!(body_string(a.unwrap()).await, "tenant_a");
    assert_eq!(body_string(b.unwrap()).await, "tenant_b");
}

#[tokio::test]
async fn downstream_error_still_clears_context() {
    let app = Router::new()
        .route(
            "/fail",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .layer(middleware::from_fn(resolve_tenant_middleware));

    let response = app
        .clone()
        .oneshot(request_with_tenant("/fail", "doomed"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(TenantContext::get(), None);
}
