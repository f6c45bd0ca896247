// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutrition log entries.

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
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

/// A single food item logged by a user.
///
/// Macronutrients are grams, sodium is milligrams.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NutritionEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fats: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub sodium: f64,
    pub meal_type: MealType,
    pub date_consumed: DateTime<Utc>,
    pub portion_size: f64,
    pub portion_unit: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new entry.
#[derive(Debug, Clone)]
pub struct NewNutritionEntry {
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fats: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub sodium: f64,
    pub meal_type: MealType,
    pub date_consumed: DateTime<Utc>,
    pub portion_size: f64,
    pub portion_unit: String,
    pub notes: Option<String>,
}

impl NutritionEntry {
    /// Build a fresh row for `user_id`.
    pub fn create(user_id: Uuid, new: NewNutritionEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            food_name: new.food_name,
            calories: new.calories,
            protein: new.protein,
            carbohydrates: new.carbohydrates,
            fats: new.fats,
            fiber: new.fiber,
            sugar: new.sugar,
            sodium: new.sodium,
            meal_type: new.meal_type,
            date_consumed: new.date_consumed,
            portion_size: new.portion_size,
            portion_unit: new.portion_unit,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        }
    }
}
