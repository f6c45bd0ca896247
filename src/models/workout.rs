// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum WorkoutType {
    Cardio,
    Strength,
    Flexibility,
    Sports,
    Other,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Cardio => "cardio",
            WorkoutType::Strength => "strength",
            WorkoutType::Flexibility => "flexibility",
            WorkoutType::Sports => "sports",
            WorkoutType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Intensity {
    Low,
    #[default]
    Moderate,
    High,
    VeryHigh,
}

/// A logged exercise session. `duration` is minutes.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_type: WorkoutType,
    pub activity_name: String,
    pub duration: i64,
    pub calories_burned: f64,
    pub intensity: Intensity,
    pub date_performed: DateTime<Utc>,
    pub distance: Option<f64>,
    pub distance_unit: String,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub weight_unit: String,
    pub heart_rate_avg: Option<i64>,
    pub heart_rate_max: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub workout_type: WorkoutType,
    pub activity_name: String,
    pub duration: i64,
    pub calories_burned: f64,
    pub intensity: Intensity,
    pub date_performed: DateTime<Utc>,
    pub distance: Option<f64>,
    pub distance_unit: String,
    pub sets: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub weight_unit: String,
    pub heart_rate_avg: Option<i64>,
    pub heart_rate_max: Option<i64>,
    pub notes: Option<String>,
}

impl Workout {
    pub fn create(user_id: Uuid, new: NewWorkout, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            workout_type: new.workout_type,
            activity_name: new.activity_name,
            duration: new.duration,
            calories_burned: new.calories_burned,
            intensity: new.intensity,
            date_performed: new.date_performed,
            distance: new.distance,
            distance_unit: new.distance_unit,
            sets: new.sets,
            reps: new.reps,
            weight: new.weight,
            weight_unit: new.weight_unit,
            heart_rate_avg: new.heart_rate_avg,
            heart_rate_max: new.heart_rate_max,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        }
    }
}
