use thiserror::Error;

/// Errors from tenant resolution, schema lifecycle and scoped connections
#[derive(Debug, Error)]
pub enum TenantError {
    #[error("Tenant ID is required. Provide it via '{header}' header or '{query_param}' query parameter.")]
    MissingIdentifier { header: String, query_param: String },

    #[error("Invalid tenant ID format. Only alphanumeric characters and underscores are allowed (1-50 characters).")]
    InvalidIdentifier(String),

    #[error("Tenant ID not found in context. Ensure the tenant resolution middleware runs ahead of this code path.")]
    MissingContext,

    #[error("Tenant schema '{0}' does not exist")]
    SchemaNotFound(String),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}
