// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Body measurement entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Mood {
    VeryPoor,
    Poor,
    Neutral,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum EnergyLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

/// One weigh-in with optional body measurements (cm).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weight: f64,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub waist_circumference: Option<f64>,
    pub chest_circumference: Option<f64>,
    pub arm_circumference: Option<f64>,
    pub thigh_circumference: Option<f64>,
    pub progress_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub mood: Option<Mood>,
    pub energy_level: Option<EnergyLevel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProgressEntry {
    pub weight: f64,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub waist_circumference: Option<f64>,
    pub chest_circumference: Option<f64>,
    pub arm_circumference: Option<f64>,
    pub thigh_circumference: Option<f64>,
    pub progress_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub mood: Option<Mood>,
    pub energy_level: Option<EnergyLevel>,
}

impl ProgressEntry {
    pub fn create(user_id: Uuid, new: NewProgressEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            weight: new.weight,
            body_fat_percentage: new.body_fat_percentage,
            muscle_mass: new.muscle_mass,
            waist_circumference: new.waist_circumference,
            chest_circumference: new.chest_circumference,
            arm_circumference: new.arm_circumference,
            thigh_circumference: new.thigh_circumference,
            progress_date: new.progress_date,
            notes: new.notes,
            mood: new.mood,
            energy_level: new.energy_level,
            created_at: now,
            updated_at: now,
        }
    }
}
