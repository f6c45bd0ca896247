// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard and trend routes.

use super::params::{parse_days, period_label, trailing_days};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::stats::{
    DailyNutrition, DailyWorkouts, NutritionTotals, RecentActivity, WorkoutTotals,
};
use crate::services::analytics::{self, RECENT_PER_KIND};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Window used by the dashboard and weekly comparisons.
const DASHBOARD_DAYS: i64 = 7;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/analytics/dashboard", get(dashboard))
        .route("/api/analytics/nutrition", get(nutrition_trend))
        .route("/api/analytics/workouts", get(workout_trend))
        .route("/api/analytics/weekly-comparisons", get(weekly_comparisons))
}

#[derive(Debug, Deserialize)]
struct DaysQuery {
    days: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardResponse {
    pub workout_stats: WorkoutTotals,
    pub nutrition_stats: NutritionTotals,
    pub goal_progress: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown[]"))]
    pub recent_activities: Vec<RecentActivity>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTrendResponse {
    pub daily_stats: Vec<DailyNutrition>,
    pub period: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTrendResponse {
    pub daily_stats: Vec<DailyWorkouts>,
    pub period: String,
}

#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutWeek {
    pub total_calories_burned: f64,
    pub total_duration: i64,
}

#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionWeek {
    pub total_calories: f64,
    pub total_protein: f64,
}

#[derive(Serialize)]
pub struct WeeklyComparisonsResponse {
    pub workouts: WorkoutWeek,
    pub nutrition: NutritionWeek,
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let user_id = auth.user_id;
    let window = trailing_days(DASHBOARD_DAYS, Utc::now());

    let (workouts, nutrition, weigh_ins) = tokio::try_join!(
        state.db.workouts_in_range(user_id, window),
        state.db.nutrition_in_range(user_id, window),
        state.db.recent_progress(user_id, 2),
    )?;

    let goal_progress = match weigh_ins.as_slice() {
        [latest, previous, ..] => analytics::goal_progress(latest.weight, previous.weight),
        _ => 0,
    };

    let (recent_workouts, recent_nutrition, recent_progress) = tokio::try_join!(
        state.db.recent_workouts(user_id, RECENT_PER_KIND),
        state.db.recent_nutrition(user_id, RECENT_PER_KIND),
        state.db.recent_progress(user_id, RECENT_PER_KIND),
    )?;

    Ok(Json(DashboardResponse {
        workout_stats: analytics::workout_totals(&workouts),
        nutrition_stats: analytics::nutrition_totals(&nutrition),
        goal_progress,
        recent_activities: analytics::recent_activities(
            recent_workouts,
            recent_nutrition,
            recent_progress,
        ),
    }))
}

async fn nutrition_trend(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<DaysQuery>,
) -> Result<Json<NutritionTrendResponse>> {
    let days = parse_days(params.days.as_deref())?;
    let entries = state
        .db
        .nutrition_in_range(auth.user_id, trailing_days(days, Utc::now()))
        .await?;

    Ok(Json(NutritionTrendResponse {
        daily_stats: analytics::daily_nutrition(&entries),
        period: period_label(days),
    }))
}

async fn workout_trend(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<DaysQuery>,
) -> Result<Json<WorkoutTrendResponse>> {
    let days = parse_days(params.days.as_deref())?;
    let workouts = state
        .db
        .workouts_in_range(auth.user_id, trailing_days(days, Utc::now()))
        .await?;

    Ok(Json(WorkoutTrendResponse {
        daily_stats: analytics::daily_workouts(&workouts),
        period: period_label(days),
    }))
}

async fn weekly_comparisons(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<WeeklyComparisonsResponse>> {
    let window = trailing_days(DASHBOARD_DAYS, Utc::now());
    let (workouts, nutrition) = tokio::try_join!(
        state.db.workouts_in_range(auth.user_id, window),
        state.db.nutrition_in_range(auth.user_id, window),
    )?;

    let workout_totals = analytics::workout_totals(&workouts);
    let nutrition_totals = analytics::nutrition_totals(&nutrition);

    Ok(Json(WeeklyComparisonsResponse {
        workouts: WorkoutWeek {
            total_calories_burned: workout_totals.total_calories_burned,
            total_duration: workout_totals.total_duration,
        },
        nutrition: NutritionWeek {
            total_calories: nutrition_totals.total_calories,
            total_protein: nutrition_totals.total_protein,
        },
    }))
}
