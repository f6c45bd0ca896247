// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::Database;
use crate::error::AppError;
use crate::models::UserPreferences;
use chrono::Utc;
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

impl Database {
    pub async fn get_preferences(&self, user_id: Uuid) -> Result<Option<UserPreferences>, AppError> {
        let prefs =
            sqlx::query_as::<_, UserPreferences>("SELECT * FROM user_preferences WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(prefs)
    }

    /// Preferences for `user_id`, inserting defaults if the row is missing.
    pub async fn get_or_create_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<UserPreferences, AppError> {
        if let Some(prefs) = self.get_preferences(user_id).await? {
            return Ok(prefs);
        }

        let prefs = UserPreferences::defaults(user_id, Utc::now());
        insert_preferences(&self.pool, &prefs).await?;
        tracing::debug!(user_id = %user_id, "Created default preferences");

        // Re-read so a concurrent insert wins consistently.
        self.get_preferences(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Preferences".to_string()))
    }

    pub async fn update_preferences(&self, prefs: &UserPreferences) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE user_preferences SET theme = ?, weekly_reports = ?, goal_reminders = ?, \
                language = ?, timezone = ?, measurement_system = ?, daily_calorie_goal = ?, \
                daily_protein_goal = ?, weekly_workout_goal = ?, updated_at = ? \
             WHERE user_id = ?",
        )
        .bind(prefs.theme)
        .bind(prefs.weekly_reports)
        .bind(prefs.goal_reminders)
        .bind(&prefs.language)
        .bind(&prefs.timezone)
        .bind(prefs.measurement_system)
        .bind(prefs.daily_calorie_goal)
        .bind(prefs.daily_protein_goal)
        .bind(prefs.weekly_workout_goal)
        .bind(prefs.updated_at)
        .bind(prefs.user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

pub(super) async fn insert_preferences<'e, E>(
    executor: E,
    prefs: &UserPreferences,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO user_preferences (id, user_id, theme, weekly_reports, goal_reminders, \
            language, timezone, measurement_system, daily_calorie_goal, daily_protein_goal, \
            weekly_workout_goal, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(user_id) DO NOTHING",
    )
    .bind(prefs.id)
    .bind(prefs.user_id)
    .bind(prefs.theme)
    .bind(prefs.weekly_reports)
    .bind(prefs.goal_reminders)
    .bind(&prefs.language)
    .bind(&prefs.timezone)
    .bind(prefs.measurement_system)
    .bind(prefs.daily_calorie_goal)
    .bind(prefs.daily_protein_goal)
    .bind(prefs.weekly_workout_goal)
    .bind(prefs.created_at)
    .bind(prefs.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}
