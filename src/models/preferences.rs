// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum MeasurementSystem {
    #[default]
    Metric,
    Imperial,
}

pub const DEFAULT_WEEKLY_WORKOUT_GOAL: i64 = 5;

/// One row per user, created alongside the account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserPreferences {
    pub id: Uuid,
    pub user_id: Uuid,
    pub theme: Theme,
    pub weekly_reports: bool,
    /// Master switch for generated reminders
    pub goal_reminders: bool,
    pub language: String,
    pub timezone: String,
    pub measurement_system: MeasurementSystem,
    pub daily_calorie_goal: Option<i64>,
    pub daily_protein_goal: Option<i64>,
    pub weekly_workout_goal: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserPreferences {
    pub fn defaults(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            theme: Theme::default(),
            weekly_reports: true,
            goal_reminders: true,
            language: "en".to_string(),
            timezone: "UTC".to_string(),
            measurement_system: MeasurementSystem::default(),
            daily_calorie_goal: None,
            daily_protein_goal: None,
            weekly_workout_goal: DEFAULT_WEEKLY_WORKOUT_GOAL,
            created_at: now,
            updated_at: now,
        }
    }
}
