// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::Database;
use crate::error::AppError;
use crate::models::Notification;
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

impl Database {
    pub async fn insert_notification(&self, notification: &Notification) -> Result<(), AppError> {
        insert_notification(&self.pool, notification).await?;
        Ok(())
    }

    /// Newest stored notifications that have not expired at `now`.
    pub async fn active_notifications(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Notification>, AppError> {
        let rows = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE user_id = ? AND (expires_at IS NULL OR expires_at >= ?) \
             ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn all_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, AppError> {
        let rows = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = ? ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Mark one notification read and return it, if owned by `user_id`.
    pub async fn mark_notification_read(
        &self,
        user_id: Uuid,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Notification>, AppError> {
        let row = sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE, updated_at = ? \
             WHERE id = ? AND user_id = ? RETURNING *",
        )
        .bind(now)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Returns how many unread rows were flipped.
    pub async fn mark_all_notifications_read(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, updated_at = ? \
             WHERE user_id = ? AND is_read = FALSE",
        )
        .bind(now)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_notification(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub(super) async fn insert_notification<'e, E>(
    executor: E,
    n: &Notification,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO notifications (id, user_id, kind, title, message, priority, is_read, \
            metadata, expires_at, dedupe_key, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(n.id)
    .bind(n.user_id)
    .bind(n.kind)
    .bind(&n.title)
    .bind(&n.message)
    .bind(n.priority)
    .bind(n.is_read)
    .bind(&n.metadata)
    .bind(n.expires_at)
    .bind(&n.dedupe_key)
    .bind(n.created_at)
    .bind(n.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}
