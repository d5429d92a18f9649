pub mod resolve_tenant;
pub mod security_headers;

pub use resolve_tenant::resolve_tenant_middleware;
pub use security_headers::security_headers_middleware;
