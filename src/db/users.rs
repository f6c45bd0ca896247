// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User rows and account lifecycle.

use super::{is_unique_violation, notifications::insert_notification, Database};
use crate::error::AppError;
use crate::models::{Notification, ProfileChanges, User, UserPreferences};
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

impl Database {
    // ─── Lookups ─────────────────────────────────────────────────

    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Lookup by normalized (lowercase) email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Whether either natural key is already taken.
    pub async fn user_exists(&self, email: &str, username: &str) -> Result<bool, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ? OR username = ?")
                .bind(email)
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    // ─── Account Creation ────────────────────────────────────────

    /// Insert a user with its preferences and welcome notification atomically.
    ///
    /// A unique-constraint race with a concurrent registration surfaces as
    /// [`AppError::DuplicateUser`].
    pub async fn create_account(
        &self,
        user: &User,
        preferences: &UserPreferences,
        welcome: &Notification,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        insert_user(&mut *tx, user).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateUser
            } else {
                e.into()
            }
        })?;
        super::preferences::insert_preferences(&mut *tx, preferences).await?;
        insert_notification(&mut *tx, welcome).await?;

        tx.commit().await?;
        tracing::info!(user_id = %user.id, "Created user account");
        Ok(())
    }

    // ─── Updates ─────────────────────────────────────────────────

    pub async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = ?, updated_at = ? WHERE id = ?")
            .bind(at)
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Apply a partial profile update and return the new row.
    pub async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AppError> {
        let result = sqlx::query(
            "UPDATE users SET \
                first_name = COALESCE(?, first_name), \
                last_name = COALESCE(?, last_name), \
                date_of_birth = COALESCE(?, date_of_birth), \
                height = COALESCE(?, height), \
                weight = COALESCE(?, weight), \
                gender = COALESCE(?, gender), \
                fitness_goal = COALESCE(?, fitness_goal), \
                activity_level = COALESCE(?, activity_level), \
                profile_image = CASE WHEN ? THEN ? ELSE profile_image END, \
                updated_at = ? \
             WHERE id = ?",
        )
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .bind(changes.date_of_birth)
        .bind(changes.height)
        .bind(changes.weight)
        .bind(changes.gender)
        .bind(changes.fitness_goal)
        .bind(changes.activity_level)
        .bind(changes.profile_image.is_some())
        .bind(changes.profile_image.clone().flatten())
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user(id).await
    }

    /// Overwrite the stored hash. Callers hash before calling.
    pub async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ─── Account Deletion ────────────────────────────────────────

    /// Hard-delete a user and everything they own in one transaction.
    ///
    /// Returns `false` if the user did not exist.
    pub async fn delete_account(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        for table in [
            "notifications",
            "nutrition_entries",
            "workouts",
            "progress_entries",
            "user_preferences",
        ] {
            let deleted = sqlx::query(&format!("DELETE FROM {} WHERE user_id = ?", table))
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::debug!(user_id = %id, table, deleted, "Deleted owned rows");
        }

        let removed = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        tracing::info!(user_id = %id, "User account deleted");
        Ok(true)
    }
}

async fn insert_user<'e, E>(executor: E, user: &User) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, first_name, last_name, \
            date_of_birth, height, weight, gender, fitness_goal, activity_level, profile_image, \
            is_verified, last_login, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.date_of_birth)
    .bind(user.height)
    .bind(user.weight)
    .bind(user.gender)
    .bind(user.fitness_goal)
    .bind(user.activity_level)
    .bind(&user.profile_image)
    .bind(user.is_verified)
    .bind(user.last_login)
    .bind(user.is_active)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}
