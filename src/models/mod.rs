// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod notification;
pub mod nutrition;
pub mod preferences;
pub mod progress;
pub mod stats;
pub mod user;
pub mod workout;

pub use notification::{Notification, NotificationKind, NotificationView, Priority};
pub use nutrition::{MealType, NewNutritionEntry, NutritionEntry};
pub use preferences::{MeasurementSystem, Theme, UserPreferences};
pub use progress::{EnergyLevel, Mood, NewProgressEntry, ProgressEntry};
pub use user::{ActivityLevel, FitnessGoal, Gender, ProfileChanges, User, UserResponse};
pub use workout::{Intensity, NewWorkout, Workout, WorkoutType};
