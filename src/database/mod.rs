pub mod models;
pub mod pool;
pub mod repository;
pub mod scoped;

pub use repository::Repository;
pub use scoped::{ScopedConnection, ScopedConnectionProvider};
