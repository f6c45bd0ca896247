// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout log routes.

use super::params::{
    parse_days, parse_enum, parse_id, period_label, resolve_range, trailing_days, Pagination,
};
use super::{EntryResponse, MessageResponse};
use crate::db::{DateRange, WorkoutFilter};
use crate::error::{AppError, Result};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::models::stats::{DailyWorkouts, WorkoutTypeStats};
use crate::models::{Intensity, NewWorkout, Workout, WorkoutType};
use crate::serde_utils::{de_opt_f64, de_opt_i64};
use crate::services::analytics;
use crate::time_utils::{de_opt_datetime, start_of_day};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const NOT_FOUND: &str = "Workout entry";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route("/api/workouts/stats", get(get_stats))
        .route("/api/workouts/weekly-comparison", get(weekly_comparison))
        .route("/api/workouts/{id}", put(update_workout).delete(delete_workout))
}

// ─── Request Bodies ──────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    #[validate(required(message = "Invalid workout type"))]
    pub workout_type: Option<WorkoutType>,
    #[validate(
        required(message = "Activity name is required"),
        length(min = 1, max = 100, message = "Activity name must be between 1 and 100 characters")
    )]
    pub activity_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    #[validate(
        required(message = "Duration is required"),
        range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes")
    )]
    pub duration: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(
        required(message = "Calories burned is required"),
        range(min = 0.0, message = "Calories burned must be a positive number")
    )]
    pub calories_burned: Option<f64>,
    pub intensity: Option<Intensity>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub date_performed: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Distance must be a positive number"))]
    pub distance: Option<f64>,
    #[validate(length(min = 1, max = 10, message = "Distance unit must be between 1 and 10 characters"))]
    pub distance_unit: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    #[validate(range(min = 0, message = "Sets must be a positive number"))]
    pub sets: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    #[validate(range(min = 0, message = "Reps must be a positive number"))]
    pub reps: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Weight must be a positive number"))]
    pub weight: Option<f64>,
    #[validate(length(min = 1, max = 10, message = "Weight unit must be between 1 and 10 characters"))]
    pub weight_unit: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    #[validate(range(min = 30, max = 250, message = "Heart rate must be between 30 and 250 bpm"))]
    pub heart_rate_avg: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    #[validate(range(min = 30, max = 250, message = "Heart rate must be between 30 and 250 bpm"))]
    pub heart_rate_max: Option<i64>,
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}

impl CreateWorkoutRequest {
    fn into_new_workout(self, now: DateTime<Utc>) -> Result<NewWorkout> {
        let missing = || AppError::BadRequest("Incomplete workout entry".to_string());
        Ok(NewWorkout {
            workout_type: self.workout_type.ok_or_else(missing)?,
            activity_name: self.activity_name.ok_or_else(missing)?.trim().to_string(),
            duration: self.duration.ok_or_else(missing)?,
            calories_burned: self.calories_burned.ok_or_else(missing)?,
            intensity: self.intensity.unwrap_or_default(),
            date_performed: self.date_performed.unwrap_or(now),
            distance: self.distance,
            distance_unit: self.distance_unit.unwrap_or_else(|| "km".to_string()),
            sets: self.sets,
            reps: self.reps,
            weight: self.weight,
            weight_unit: self.weight_unit.unwrap_or_else(|| "kg".to_string()),
            heart_rate_avg: self.heart_rate_avg,
            heart_rate_max: self.heart_rate_max,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutRequest {
    pub workout_type: Option<WorkoutType>,
    #[validate(length(min = 1, max = 100, message = "Activity name must be between 1 and 100 characters"))]
    pub activity_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    #[validate(range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Calories burned must be a positive number"))]
    pub calories_burned: Option<f64>,
    pub intensity: Option<Intensity>,
    #[serde(default, deserialize_with = "de_opt_datetime")]
    pub date_performed: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Distance must be a positive number"))]
    pub distance: Option<f64>,
    #[validate(length(min = 1, max = 10, message = "Distance unit must be between 1 and 10 characters"))]
    pub distance_unit: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    #[validate(range(min = 0, message = "Sets must be a positive number"))]
    pub sets: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    #[validate(range(min = 0, message = "Reps must be a positive number"))]
    pub reps: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    #[validate(range(min = 0.0, message = "Weight must be a positive number"))]
    pub weight: Option<f64>,
    #[validate(length(min = 1, max = 10, message = "Weight unit must be between 1 and 10 characters"))]
    pub weight_unit: Option<String>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    #[validate(range(min = 30, max = 250, message = "Heart rate must be between 30 and 250 bpm"))]
    pub heart_rate_avg: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_i64")]
    #[validate(range(min = 30, max = 250, message = "Heart rate must be between 30 and 250 bpm"))]
    pub heart_rate_max: Option<i64>,
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"))]
    pub notes: Option<String>,
}

impl UpdateWorkoutRequest {
    fn apply(self, workout: &mut Workout, now: DateTime<Utc>) {
        if let Some(v) = self.workout_type {
            workout.workout_type = v;
        }
        if let Some(v) = self.activity_name {
            workout.activity_name = v.trim().to_string();
        }
        if let Some(v) = self.duration {
            workout.duration = v;
        }
        if let Some(v) = self.calories_burned {
            workout.calories_burned = v;
        }
        if let Some(v) = self.intensity {
            workout.intensity = v;
        }
        if let Some(v) = self.date_performed {
            workout.date_performed = v;
        }
        if let Some(v) = self.distance_unit {
            workout.distance_unit = v;
        }
        if let Some(v) = self.weight_unit {
            workout.weight_unit = v;
        }
        // Optional measurements: a present value replaces, absence keeps.
        workout.distance = self.distance.or(workout.distance);
        workout.sets = self.sets.or(workout.sets);
        workout.reps = self.reps.or(workout.reps);
        workout.weight = self.weight.or(workout.weight);
        workout.heart_rate_avg = self.heart_rate_avg.or(workout.heart_rate_avg);
        workout.heart_rate_max = self.heart_rate_max.or(workout.heart_rate_max);
        if self.notes.is_some() {
            workout.notes = self.notes;
        }
        workout.updated_at = now;
    }
}

// ─── Queries / Responses ─────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    date: Option<String>,
    workout_type: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatsQuery {
    days: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutListResponse {
    pub entries: Vec<Workout>,
    pub total_count: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub total_calories_burned: f64,
    pub total_duration: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutStatsResponse {
    pub daily_stats: Vec<DailyWorkouts>,
    pub workout_type_stats: Vec<WorkoutTypeStats>,
    pub period: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutWeeklyComparison {
    pub message: String,
    /// One row per day with at least one workout, oldest first
    pub data: Vec<DailyWorkouts>,
}

// ─── Handlers ────────────────────────────────────────────────

async fn create_workout(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<EntryResponse<Workout>>)> {
    let now = Utc::now();
    let workout = Workout::create(auth.user_id, body.into_new_workout(now)?, now);
    state.db.insert_workout(&workout).await?;

    tracing::debug!(user_id = %auth.user_id, workout_id = %workout.id, "Workout added");

    Ok((
        StatusCode::CREATED,
        Json(EntryResponse::new("Workout entry added successfully", workout)),
    ))
}

async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListQuery>,
) -> Result<Json<WorkoutListResponse>> {
    let pagination = Pagination::parse(params.page.as_deref(), params.limit.as_deref())?;
    let filter = WorkoutFilter {
        range: resolve_range(
            params.date.as_deref(),
            params.start_date.as_deref(),
            params.end_date.as_deref(),
        )?,
        workout_type: parse_enum("workoutType", params.workout_type.as_deref())?,
    };

    let (workouts, totals) = state
        .db
        .list_workouts(auth.user_id, &filter, pagination.request()?)
        .await?;

    Ok(Json(WorkoutListResponse {
        entries: workouts,
        total_count: totals.count,
        total_pages: pagination.total_pages(totals.count),
        current_page: pagination.page,
        total_calories_burned: totals.calories_burned,
        total_duration: totals.duration,
    }))
}

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<WorkoutStatsResponse>> {
    let days = parse_days(params.days.as_deref())?;
    let workouts = state
        .db
        .workouts_in_range(auth.user_id, trailing_days(days, Utc::now()))
        .await?;

    Ok(Json(WorkoutStatsResponse {
        daily_stats: analytics::daily_workouts(&workouts),
        workout_type_stats: analytics::workout_type_stats(&workouts),
        period: period_label(days),
    }))
}

/// Per-day totals from midnight seven days ago through today.
async fn weekly_comparison(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<WorkoutWeeklyComparison>> {
    let start = start_of_day(Utc::now()) - Duration::days(7);
    let workouts = state
        .db
        .workouts_in_range(auth.user_id, DateRange::since(start))
        .await?;

    Ok(Json(WorkoutWeeklyComparison {
        message: "Weekly workout comparison retrieved successfully".to_string(),
        data: analytics::daily_workouts(&workouts),
    }))
}

async fn update_workout(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateWorkoutRequest>,
) -> Result<Json<EntryResponse<Workout>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let mut workout = state
        .db
        .get_workout(auth.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    body.apply(&mut workout, Utc::now());
    state.db.update_workout(&workout).await?;

    Ok(Json(EntryResponse::new(
        "Workout entry updated successfully",
        workout,
    )))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    if !state.db.delete_workout(auth.user_id, id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(MessageResponse::new("Workout entry deleted successfully")))
}
