use std::cell::RefCell;
use std::fmt;
use std::future::Future;

use super::error::TenantError;
use super::schema::SCHEMA_PREFIX;

/// Upper bound on tenant identifier length, matching the admin API contract.
pub const MAX_IDENTIFIER_LEN: usize = 50;

/// Validated tenant identifier: 1-50 characters, alphanumeric or underscore.
///
/// Construction is the single validation point. Anything holding a `TenantId`
/// can assume the value is safe to embed in a schema name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(raw: &str) -> Result<Self, TenantError> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_IDENTIFIER_LEN
            && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid {
            return Err(TenantError::InvalidIdentifier(raw.to_string()));
        }

        Ok(TenantId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Postgres schema name for this tenant, e.g. `tenant_acme`.
    pub fn schema_name(&self) -> String {
        format!("{}{}", SCHEMA_PREFIX, self.0)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

tokio::task_local! {
    static ACTIVE_TENANT: RefCell<Option<TenantId>>;
}

/// Task-local slot holding the tenant active for the current request.
///
/// The slot only exists inside a `TenantContext::scope(..)` call; the
/// resolution middleware opens one scope per request, so concurrent requests
/// never see each other's value and the slot is torn down when the request
/// future completes, errors, panics or is cancelled. Note that tasks spawned
/// with `tokio::spawn` do not inherit the slot.
pub struct TenantContext;

impl TenantContext {
    /// Run `fut` with its own tenant slot, initialized to `tenant`.
    pub async fn scope<F>(tenant: Option<TenantId>, fut: F) -> F::Output
    where
        F: Future,
    {
        ACTIVE_TENANT.scope(RefCell::new(tenant), fut).await
    }

    /// Store `tenant` in the current slot. Outside any scope this drops the
    /// value, which indicates the middleware is not installed.
    pub fn set(tenant: TenantId) {
        if ACTIVE_TENANT
            .try_with(|slot| *slot.borrow_mut() = Some(tenant))
            .is_err()
        {
            tracing::warn!("TenantContext::set called outside a tenant scope; value dropped");
        }
    }

    /// Active tenant for the current task, or `None` when unset or outside
    /// any scope.
    pub fn get() -> Option<TenantId> {
        ACTIVE_TENANT
            .try_with(|slot| slot.borrow().clone())
            .ok()
            .flatten()
    }

    /// Reset the current slot to unset.
    pub fn clear() {
        let _ = ACTIVE_TENANT.try_with(|slot| slot.borrow_mut().take());
    }
}
