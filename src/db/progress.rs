// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{DateRange, Database, PageRequest};
use crate::error::AppError;
use crate::models::ProgressEntry;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

fn where_clause<'a>(select: &str, user_id: Uuid, range: DateRange) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new(select);
    qb.push(" FROM progress_entries WHERE user_id = ").push_bind(user_id);
    range.push_to(&mut qb, "progress_date");
    qb
}

impl Database {
    pub async fn insert_progress(&self, entry: &ProgressEntry) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO progress_entries (id, user_id, weight, body_fat_percentage, muscle_mass, \
                waist_circumference, chest_circumference, arm_circumference, thigh_circumference, \
                progress_date, notes, mood, energy_level, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.weight)
        .bind(entry.body_fat_percentage)
        .bind(entry.muscle_mass)
        .bind(entry.waist_circumference)
        .bind(entry.chest_circumference)
        .bind(entry.arm_circumference)
        .bind(entry.thigh_circumference)
        .bind(entry.progress_date)
        .bind(&entry.notes)
        .bind(entry.mood)
        .bind(entry.energy_level)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_progress(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ProgressEntry>, AppError> {
        let entry = sqlx::query_as::<_, ProgressEntry>(
            "SELECT * FROM progress_entries WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    /// One page, newest first, plus the total count for `range`.
    pub async fn list_progress(
        &self,
        user_id: Uuid,
        range: DateRange,
        page: PageRequest,
    ) -> Result<(Vec<ProgressEntry>, i64), AppError> {
        let mut qb = where_clause("SELECT *", user_id, range);
        qb.push(" ORDER BY progress_date DESC, created_at DESC");
        page.push_to(&mut qb);
        let entries = qb
            .build_query_as::<ProgressEntry>()
            .fetch_all(&self.pool)
            .await?;

        let (count,) = where_clause("SELECT COUNT(*)", user_id, range)
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await?;

        Ok((entries, count))
    }

    /// All entries in `range`, oldest first.
    pub async fn progress_in_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<ProgressEntry>, AppError> {
        let mut qb = where_clause("SELECT *", user_id, range);
        qb.push(" ORDER BY progress_date ASC");
        let entries = qb
            .build_query_as::<ProgressEntry>()
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    /// Newest `limit` entries by measurement date.
    pub async fn recent_progress(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ProgressEntry>, AppError> {
        let entries = sqlx::query_as::<_, ProgressEntry>(
            "SELECT * FROM progress_entries WHERE user_id = ? \
             ORDER BY progress_date DESC, created_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn all_progress(&self, user_id: Uuid) -> Result<Vec<ProgressEntry>, AppError> {
        self.progress_in_range(user_id, DateRange::default()).await
    }

    pub async fn update_progress(&self, entry: &ProgressEntry) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE progress_entries SET weight = ?, body_fat_percentage = ?, muscle_mass = ?, \
                waist_circumference = ?, chest_circumference = ?, arm_circumference = ?, \
                thigh_circumference = ?, progress_date = ?, notes = ?, mood = ?, \
                energy_level = ?, updated_at = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(entry.weight)
        .bind(entry.body_fat_percentage)
        .bind(entry.muscle_mass)
        .bind(entry.waist_circumference)
        .bind(entry.chest_circumference)
        .bind(entry.arm_circumference)
        .bind(entry.thigh_circumference)
        .bind(entry.progress_date)
        .bind(&entry.notes)
        .bind(entry.mood)
        .bind(entry.energy_level)
        .bind(entry.updated_at)
        .bind(entry.id)
        .bind(entry.user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_progress(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM progress_entries WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
