use sqlx::PgPool;
use tracing::info;

use super::context::TenantId;
use super::error::TenantError;

/// Naming prefix for tenant schemas. The identifier-to-namespace mapping is
/// the deterministic function `tenant_<identifier>`.
pub const SCHEMA_PREFIX: &str = "tenant_";

/// Per-tenant table set, mirroring the public schema's definitions. All
/// statements are idempotent so provisioning can safely run more than once
/// for the same tenant.
const TENANT_TABLES: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS account (
        id BIGSERIAL PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL,
        full_name TEXT,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS notification (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        message TEXT NOT NULL,
        is_read BOOLEAN NOT NULL DEFAULT FALSE,
        account_id BIGINT NOT NULL REFERENCES account(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE INDEX IF NOT EXISTS notification_account_id_idx
        ON notification (account_id)"#,
    r#"CREATE TABLE IF NOT EXISTS audit_logs (
        id BIGSERIAL PRIMARY KEY,
        user_id TEXT,
        action TEXT NOT NULL,
        severity TEXT NOT NULL DEFAULT 'info',
        resource TEXT,
        details TEXT,
        ip_address TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS user_consents (
        id BIGSERIAL PRIMARY KEY,
        user_id TEXT NOT NULL,
        consent_type TEXT NOT NULL,
        granted BOOLEAN NOT NULL DEFAULT FALSE,
        granted_at TIMESTAMPTZ,
        revoked_at TIMESTAMPTZ,
        ip_address TEXT,
        user_agent TEXT,
        consent_text TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE INDEX IF NOT EXISTS user_consents_user_id_idx
        ON user_consents (user_id)"#,
    r#"CREATE TABLE IF NOT EXISTS data_processing_logs (
        id BIGSERIAL PRIMARY KEY,
        user_id TEXT NOT NULL,
        purpose TEXT NOT NULL,
        data_categories TEXT,
        legal_basis TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS data_subject_requests (
        id BIGSERIAL PRIMARY KEY,
        user_id TEXT NOT NULL,
        request_type TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        resolved_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS data_retention_records (
        id BIGSERIAL PRIMARY KEY,
        resource TEXT NOT NULL,
        policy TEXT NOT NULL,
        retain_until TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS encryption_keys (
        id BIGSERIAL PRIMARY KEY,
        key_id TEXT NOT NULL UNIQUE,
        algorithm TEXT NOT NULL,
        key_material TEXT NOT NULL,
        rotated_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
];

/// Administrative create/list/drop operations on tenant schemas.
///
/// Identifier validation happens at `TenantId` construction, before any
/// storage call. Engine failures propagate as `TenantError::Storage` with no
/// retry; a racing create/drop for the same identifier serializes inside the
/// engine.
#[derive(Clone)]
pub struct SchemaManager {
    pool: PgPool,
}

impl SchemaManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tenant's schema and its full table set. No-op when the
    /// schema and tables already exist.
    pub async fn create_namespace(&self, tenant: &TenantId) -> Result<(), TenantError> {
        let schema = tenant.schema_name();
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "CREATE SCHEMA IF NOT EXISTS {}",
            quote_identifier(&schema)
        ))
        .execute(&mut *tx)
        .await?;

        // SET LOCAL scopes the search_path to this transaction, so the
        // unqualified CREATE TABLE statements land in the new schema without
        // disturbing the session the pool hands out next.
        sqlx::query(&format!(
            "SET LOCAL search_path TO {}",
            quote_identifier(&schema)
        ))
        .execute(&mut *tx)
        .await?;

        for ddl in TENANT_TABLES {
            sqlx::query(ddl).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        info!(schema = %schema, "tenant schema ready");
        Ok(())
    }

    /// Drop the tenant's schema. Cascade mode destroys all contained data;
    /// restrict mode fails if the schema is non-empty. Irreversible.
    pub async fn drop_namespace(&self, tenant: &TenantId, cascade: bool) -> Result<(), TenantError> {
        let schema = tenant.schema_name();
        let behavior = if cascade { "CASCADE" } else { "RESTRICT" };

        sqlx::query(&format!(
            "DROP SCHEMA IF EXISTS {} {}",
            quote_identifier(&schema),
            behavior
        ))
        .execute(&self.pool)
        .await?;

        info!(schema = %schema, cascade, "tenant schema dropped");
        Ok(())
    }

    /// Bare identifiers of all tenant schemas, in engine order.
    pub async fn list_namespaces(&self) -> Result<Vec<String>, TenantError> {
        // '_' is a LIKE wildcard; escape it so only the literal prefix matches
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT schema_name FROM information_schema.schemata \
             WHERE schema_name LIKE 'tenant\\_%' ESCAPE '\\'",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(name,)| name.strip_prefix(SCHEMA_PREFIX).map(str::to_string))
            .collect())
    }
}

/// Quote a SQL identifier to prevent injection
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_identifier("tenant_acme"), "\"tenant_acme\"");
        assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn tenant_tables_are_idempotent() {
        for ddl in TENANT_TABLES {
            let ddl = ddl.trim_start();
            assert!(
                ddl.starts_with("CREATE TABLE IF NOT EXISTS")
                    || ddl.starts_with("CREATE INDEX IF NOT EXISTS"),
                "non-idempotent DDL: {}",
                &ddl[..60.min(ddl.len())]
            );
        }
    }
}
