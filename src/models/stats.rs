// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Aggregates computed from logged entries for stats and dashboard views.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{MealType, NutritionEntry, ProgressEntry, Workout, WorkoutType};

// ─── Nutrition ───────────────────────────────────────────────

/// Per-day nutrition sums (UTC days).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyNutrition {
    pub date: NaiveDate,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fats: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MealTypeStats {
    pub meal_type: MealType,
    pub total_calories: f64,
    pub entry_count: i64,
}

/// Macro sums over a week.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fats: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NutritionTotals {
    pub total_entries: i64,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fats: f64,
}

// ─── Workouts ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyWorkouts {
    pub date: NaiveDate,
    pub total_calories_burned: f64,
    pub total_duration: i64,
    pub workout_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutTypeStats {
    pub workout_type: WorkoutType,
    pub total_calories_burned: f64,
    pub total_duration: i64,
    pub workout_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutTotals {
    pub total_workouts: i64,
    pub total_calories_burned: f64,
    pub total_duration: i64,
}

// ─── Progress ────────────────────────────────────────────────

/// Zeros when the window has no entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BodyAverages {
    pub avg_weight: f64,
    pub avg_body_fat: f64,
}

// ─── Dashboard ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Workout,
    Nutrition,
    Progress,
}

/// The underlying record, serialized inline next to `type`/`timestamp`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ActivityRecord {
    Workout(Workout),
    Nutrition(NutritionEntry),
    Progress(ProgressEntry),
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentActivity {
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub record: ActivityRecord,
}

impl From<Workout> for RecentActivity {
    fn from(w: Workout) -> Self {
        Self {
            kind: ActivityKind::Workout,
            timestamp: w.date_performed,
            record: ActivityRecord::Workout(w),
        }
    }
}

impl From<NutritionEntry> for RecentActivity {
    fn from(n: NutritionEntry) -> Self {
        Self {
            kind: ActivityKind::Nutrition,
            timestamp: n.date_consumed,
            record: ActivityRecord::Nutrition(n),
        }
    }
}

impl From<ProgressEntry> for RecentActivity {
    fn from(p: ProgressEntry) -> Self {
        Self {
            kind: ActivityKind::Progress,
            timestamp: p.progress_date,
            record: ActivityRecord::Progress(p),
        }
    }
}
