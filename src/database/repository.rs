use async_trait::async_trait;

use crate::database::scoped::ScopedConnection;

/// Generic CRUD contract over one entity type.
///
/// The tenant-scoped connection is injected per call, so repositories stay
/// stateless and tenant-agnostic; which schema a query hits is decided
/// entirely by the connection handed in.
#[async_trait]
pub trait Repository<T, C, U>: Send + Sync {
    async fn get(&self, conn: &mut ScopedConnection, id: i64) -> Result<Option<T>, sqlx::Error>;

    async fn list(
        &self,
        conn: &mut ScopedConnection,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<T>, sqlx::Error>;

    async fn create(&self, conn: &mut ScopedConnection, input: C) -> Result<T, sqlx::Error>;

    /// Returns `None` when no row with `id` exists.
    async fn update(
        &self,
        conn: &mut ScopedConnection,
        id: i64,
        input: U,
    ) -> Result<Option<T>, sqlx::Error>;

    /// Returns whether a row was actually deleted.
    async fn delete(&self, conn: &mut ScopedConnection, id: i64) -> Result<bool, sqlx::Error>;
}
