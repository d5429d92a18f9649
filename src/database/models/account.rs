use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::repository::Repository;
use crate::database::scoped::ScopedConnection;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AccountCreate {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AccountUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
}

pub struct AccountRepository;

#[async_trait]
impl Repository<Account, AccountCreate, AccountUpdate> for AccountRepository {
    async fn get(
        &self,
        conn: &mut ScopedConnection,
        id: i64,
    ) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>("SELECT * FROM account WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **conn)
            .await
    }

    async fn list(
        &self,
        conn: &mut ScopedConnection,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>("SELECT * FROM account ORDER BY id OFFSET $1 LIMIT $2")
            .bind(skip)
            .bind(limit)
            .fetch_all(&mut **conn)
            .await
    }

    async fn create(
        &self,
        conn: &mut ScopedConnection,
        input: AccountCreate,
    ) -> Result<Account, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO account (email, hashed_password, full_name) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&input.email)
        .bind(hash_password(&input.password))
        .bind(&input.full_name)
        .fetch_one(&mut **conn)
        .await
    }

    async fn update(
        &self,
        conn: &mut ScopedConnection,
        id: i64,
        input: AccountUpdate,
    ) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            "UPDATE account SET \
                email = COALESCE($2, email), \
                full_name = COALESCE($3, full_name), \
                is_active = COALESCE($4, is_active), \
                updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.email)
        .bind(&input.full_name)
        .bind(input.is_active)
        .fetch_optional(&mut **conn)
        .await
    }

    async fn delete(&self, conn: &mut ScopedConnection, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&mut **conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// TODO: delegate hashing to the auth service once it lands
fn hash_password(raw: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_stable_and_not_plaintext() {
        let a = hash_password("hunter2");
        let b = hash_password("hunter2");
        assert_eq!(a, b);
        assert_ne!(a, "hunter2");
        assert_eq!(a.len(), 64);
    }
}
