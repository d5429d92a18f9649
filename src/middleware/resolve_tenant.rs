use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::config;
use crate::error::ApiError;
use crate::tenant::{TenantContext, TenantError, TenantId};

/// Middleware that resolves the tenant for each inbound request and binds it
/// to the request's context for the duration of the downstream call.
///
/// The tenant ID can be provided via:
/// 1. Header: `x-tenant-id`
/// 2. Query parameter: `tenantId`
///
/// Allow-listed infrastructure paths pass through untouched. Missing or
/// malformed identifiers are rejected with 400 before the downstream handler
/// runs. The context scope is torn down when the request future completes,
/// whether it returns, errors, panics or is cancelled, so a worker reused for
/// a later request never observes a stale tenant.
pub async fn resolve_tenant_middleware(request: Request, next: Next) -> Response {
    let tenancy = &config().tenancy;
    let path = request.uri().path();

    // Infrastructure endpoints never require a tenant
    if tenancy
        .excluded_paths
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
    {
        return next.run(request).await;
    }

    let raw = header_value(&request, &tenancy.header)
        .or_else(|| query_value(&request, &tenancy.query_param));

    let Some(raw) = raw else {
        return ApiError::from(TenantError::MissingIdentifier {
            header: tenancy.header.clone(),
            query_param: tenancy.query_param.clone(),
        })
        .into_response();
    };

    let tenant = match TenantId::new(&raw) {
        Ok(tenant) => tenant,
        Err(err) => return ApiError::from(err).into_response(),
    };

    tracing::debug!(tenant = %tenant, path = %path, "tenant resolved");

    TenantContext::scope(None, async move {
        TenantContext::set(tenant);
        let response = next.run(request).await;
        // Scope teardown clears the slot as well; the explicit clear keeps
        // it empty for anything running between the handler and scope exit.
        TenantContext::clear();
        response
    })
    .await
}

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn query_value(request: &Request, name: &str) -> Option<String> {
    let query = request.uri().query()?;
    // Values arrive percent-encoded; decode before format validation so
    // e.g. tenantId=acme%5Fcorp resolves to acme_corp
    url::form_urlencoded::parse(query.as_bytes())
        .find_map(|(key, value)| (key == name).then(|| value.into_owned()))
}
