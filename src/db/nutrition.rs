// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{DateRange, Database, PageRequest};
use crate::error::AppError;
use crate::models::{MealType, NutritionEntry};
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

/// Filters for the nutrition list endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct NutritionFilter {
    pub range: DateRange,
    pub meal_type: Option<MealType>,
}

impl NutritionFilter {
    fn where_clause<'a>(&self, select: &str, user_id: Uuid) -> QueryBuilder<'a, Sqlite> {
        let mut qb = QueryBuilder::new(select);
        qb.push(" FROM nutrition_entries WHERE user_id = ").push_bind(user_id);
        self.range.push_to(&mut qb, "date_consumed");
        if let Some(meal_type) = self.meal_type {
            qb.push(" AND meal_type = ").push_bind(meal_type);
        }
        qb
    }
}

impl Database {
    pub async fn insert_nutrition(&self, entry: &NutritionEntry) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO nutrition_entries (id, user_id, food_name, calories, protein, \
                carbohydrates, fats, fiber, sugar, sodium, meal_type, date_consumed, \
                portion_size, portion_unit, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.food_name)
        .bind(entry.calories)
        .bind(entry.protein)
        .bind(entry.carbohydrates)
        .bind(entry.fats)
        .bind(entry.fiber)
        .bind(entry.sugar)
        .bind(entry.sodium)
        .bind(entry.meal_type)
        .bind(entry.date_consumed)
        .bind(entry.portion_size)
        .bind(&entry.portion_unit)
        .bind(&entry.notes)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Entry by id, only if owned by `user_id`.
    pub async fn get_nutrition(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<NutritionEntry>, AppError> {
        let entry = sqlx::query_as::<_, NutritionEntry>(
            "SELECT * FROM nutrition_entries WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    /// One page of entries, newest first, with the filtered count and
    /// calorie sum.
    pub async fn list_nutrition(
        &self,
        user_id: Uuid,
        filter: &NutritionFilter,
        page: PageRequest,
    ) -> Result<(Vec<NutritionEntry>, i64, f64), AppError> {
        let mut qb = filter.where_clause("SELECT *", user_id);
        qb.push(" ORDER BY date_consumed DESC, created_at DESC");
        page.push_to(&mut qb);
        let entries = qb
            .build_query_as::<NutritionEntry>()
            .fetch_all(&self.pool)
            .await?;

        let mut totals =
            filter.where_clause("SELECT COUNT(*), COALESCE(SUM(calories), 0.0)", user_id);
        let (count, total_calories) = totals
            .build_query_as::<(i64, f64)>()
            .fetch_one(&self.pool)
            .await?;

        Ok((entries, count, total_calories))
    }

    /// All entries in `range`, oldest first.
    pub async fn nutrition_in_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<NutritionEntry>, AppError> {
        let filter = NutritionFilter {
            range,
            meal_type: None,
        };
        let mut qb = filter.where_clause("SELECT *", user_id);
        qb.push(" ORDER BY date_consumed ASC");
        let entries = qb
            .build_query_as::<NutritionEntry>()
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    pub async fn recent_nutrition(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NutritionEntry>, AppError> {
        let entries = sqlx::query_as::<_, NutritionEntry>(
            "SELECT * FROM nutrition_entries WHERE user_id = ? \
             ORDER BY date_consumed DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Every entry the user owns, for export.
    pub async fn all_nutrition(&self, user_id: Uuid) -> Result<Vec<NutritionEntry>, AppError> {
        self.nutrition_in_range(user_id, DateRange::default()).await
    }

    /// Persist all mutable columns of an existing entry.
    pub async fn update_nutrition(&self, entry: &NutritionEntry) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE nutrition_entries SET food_name = ?, calories = ?, protein = ?, \
                carbohydrates = ?, fats = ?, fiber = ?, sugar = ?, sodium = ?, meal_type = ?, \
                date_consumed = ?, portion_size = ?, portion_unit = ?, notes = ?, updated_at = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(&entry.food_name)
        .bind(entry.calories)
        .bind(entry.protein)
        .bind(entry.carbohydrates)
        .bind(entry.fats)
        .bind(entry.fiber)
        .bind(entry.sugar)
        .bind(entry.sodium)
        .bind(entry.meal_type)
        .bind(entry.date_consumed)
        .bind(entry.portion_size)
        .bind(&entry.portion_unit)
        .bind(&entry.notes)
        .bind(entry.updated_at)
        .bind(entry.id)
        .bind(entry.user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Returns `false` if nothing owned by `user_id` matched.
    pub async fn delete_nutrition(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM nutrition_entries WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
