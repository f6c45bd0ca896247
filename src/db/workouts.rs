// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::{DateRange, Database, PageRequest};
use crate::error::AppError;
use crate::models::{Workout, WorkoutType};
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default)]
pub struct WorkoutFilter {
    pub range: DateRange,
    pub workout_type: Option<WorkoutType>,
}

impl WorkoutFilter {
    fn where_clause<'a>(&self, select: &str, user_id: Uuid) -> QueryBuilder<'a, Sqlite> {
        let mut qb = QueryBuilder::new(select);
        qb.push(" FROM workouts WHERE user_id = ").push_bind(user_id);
        self.range.push_to(&mut qb, "date_performed");
        if let Some(workout_type) = self.workout_type {
            qb.push(" AND workout_type = ").push_bind(workout_type);
        }
        qb
    }
}

/// Totals over the filtered set, independent of paging.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorkoutListTotals {
    pub count: i64,
    pub calories_burned: f64,
    pub duration: i64,
}

impl Database {
    pub async fn insert_workout(&self, workout: &Workout) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO workouts (id, user_id, workout_type, activity_name, duration, \
                calories_burned, intensity, date_performed, distance, distance_unit, sets, reps, \
                weight, weight_unit, heart_rate_avg, heart_rate_max, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(workout.id)
        .bind(workout.user_id)
        .bind(workout.workout_type)
        .bind(&workout.activity_name)
        .bind(workout.duration)
        .bind(workout.calories_burned)
        .bind(workout.intensity)
        .bind(workout.date_performed)
        .bind(workout.distance)
        .bind(&workout.distance_unit)
        .bind(workout.sets)
        .bind(workout.reps)
        .bind(workout.weight)
        .bind(&workout.weight_unit)
        .bind(workout.heart_rate_avg)
        .bind(workout.heart_rate_max)
        .bind(&workout.notes)
        .bind(workout.created_at)
        .bind(workout.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_workout(&self, user_id: Uuid, id: Uuid) -> Result<Option<Workout>, AppError> {
        let workout =
            sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(workout)
    }

    pub async fn list_workouts(
        &self,
        user_id: Uuid,
        filter: &WorkoutFilter,
        page: PageRequest,
    ) -> Result<(Vec<Workout>, WorkoutListTotals), AppError> {
        let mut qb = filter.where_clause("SELECT *", user_id);
        qb.push(" ORDER BY date_performed DESC, created_at DESC");
        page.push_to(&mut qb);
        let workouts = qb
            .build_query_as::<Workout>()
            .fetch_all(&self.pool)
            .await?;

        let mut totals = filter.where_clause(
            "SELECT COUNT(*), COALESCE(SUM(calories_burned), 0.0), COALESCE(SUM(duration), 0)",
            user_id,
        );
        let (count, calories_burned, duration) = totals
            .build_query_as::<(i64, f64, i64)>()
            .fetch_one(&self.pool)
            .await?;

        Ok((
            workouts,
            WorkoutListTotals {
                count,
                calories_burned,
                duration,
            },
        ))
    }

    /// All workouts in `range`, oldest first.
    pub async fn workouts_in_range(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> Result<Vec<Workout>, AppError> {
        let filter = WorkoutFilter {
            range,
            workout_type: None,
        };
        let mut qb = filter.where_clause("SELECT *", user_id);
        qb.push(" ORDER BY date_performed ASC");
        let workouts = qb
            .build_query_as::<Workout>()
            .fetch_all(&self.pool)
            .await?;
        Ok(workouts)
    }

    pub async fn recent_workouts(&self, user_id: Uuid, limit: i64) -> Result<Vec<Workout>, AppError> {
        let workouts = sqlx::query_as::<_, Workout>(
            "SELECT * FROM workouts WHERE user_id = ? ORDER BY date_performed DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(workouts)
    }

    pub async fn all_workouts(&self, user_id: Uuid) -> Result<Vec<Workout>, AppError> {
        self.workouts_in_range(user_id, DateRange::default()).await
    }

    pub async fn update_workout(&self, workout: &Workout) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE workouts SET workout_type = ?, activity_name = ?, duration = ?, \
                calories_burned = ?, intensity = ?, date_performed = ?, distance = ?, \
                distance_unit = ?, sets = ?, reps = ?, weight = ?, weight_unit = ?, \
                heart_rate_avg = ?, heart_rate_max = ?, notes = ?, updated_at = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(workout.workout_type)
        .bind(&workout.activity_name)
        .bind(workout.duration)
        .bind(workout.calories_burned)
        .bind(workout.intensity)
        .bind(workout.date_performed)
        .bind(workout.distance)
        .bind(&workout.distance_unit)
        .bind(workout.sets)
        .bind(workout.reps)
        .bind(workout.weight)
        .bind(&workout.weight_unit)
        .bind(workout.heart_rate_avg)
        .bind(workout.heart_rate_max)
        .bind(&workout.notes)
        .bind(workout.updated_at)
        .bind(workout.id)
        .bind(workout.user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_workout(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
