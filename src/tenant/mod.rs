pub mod context;
pub mod error;
pub mod schema;

pub use context::{TenantContext, TenantId};
pub use error::TenantError;
pub use schema::SchemaManager;
