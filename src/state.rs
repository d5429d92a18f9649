use crate::database::ScopedConnectionProvider;
use crate::tenant::SchemaManager;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: ScopedConnectionProvider,
    pub schemas: SchemaManager,
}

impl AppState {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            db: ScopedConnectionProvider::new(pool.clone()),
            schemas: SchemaManager::new(pool),
        }
    }
}
