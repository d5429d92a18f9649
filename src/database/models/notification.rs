use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::repository::Repository;
use crate::database::scoped::ScopedConnection;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub account_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationCreate {
    pub title: String,
    pub message: String,
    pub account_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationUpdate {
    pub title: Option<String>,
    pub message: Option<String>,
    pub is_read: Option<bool>,
}

pub struct NotificationRepository;

#[async_trait]
impl Repository<Notification, NotificationCreate, NotificationUpdate> for NotificationRepository {
    async fn get(
        &self,
        conn: &mut ScopedConnection,
        id: i64,
    ) -> Result<Option<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notification WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **conn)
            .await
    }

    async fn list(
        &self,
        conn: &mut ScopedConnection,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notification ORDER BY id OFFSET $1 LIMIT $2",
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut **conn)
        .await
    }

    async fn create(
        &self,
        conn: &mut ScopedConnection,
        input: NotificationCreate,
    ) -> Result<Notification, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notification (title, message, account_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&input.title)
        .bind(&input.message)
        .bind(input.account_id)
        .fetch_one(&mut **conn)
        .await
    }

    async fn update(
        &self,
        conn: &mut ScopedConnection,
        id: i64,
        input: NotificationUpdate,
    ) -> Result<Option<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notification SET \
                title = COALESCE($2, title), \
                message = COALESCE($3, message), \
                is_read = COALESCE($4, is_read), \
                updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.message)
        .bind(input.is_read)
        .fetch_optional(&mut **conn)
        .await
    }

    async fn delete(&self, conn: &mut ScopedConnection, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notification WHERE id = $1")
            .bind(id)
            .execute(&mut **conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl NotificationRepository {
    pub async fn list_by_account(
        &self,
        conn: &mut ScopedConnection,
        account_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notification WHERE account_id = $1 \
             ORDER BY id OFFSET $2 LIMIT $3",
        )
        .bind(account_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut **conn)
        .await
    }

    pub async fn unread_count(
        &self,
        conn: &mut ScopedConnection,
        account_id: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notification WHERE account_id = $1 AND is_read = FALSE",
        )
        .bind(account_id)
        .fetch_one(&mut **conn)
        .await
    }

    pub async fn mark_read(
        &self,
        conn: &mut ScopedConnection,
        id: i64,
    ) -> Result<Option<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notification SET is_read = TRUE, updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut **conn)
        .await
    }
}
