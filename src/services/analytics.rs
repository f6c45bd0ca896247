// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Aggregations over logged entries.
//!
//! Everything here is a pure function of the rows passed in; the route
//! handlers fetch the rows for the relevant window and call these.

use std::collections::BTreeMap;

use crate::models::stats::{
    BodyAverages, DailyNutrition, DailyWorkouts, MacroTotals, MealTypeStats, NutritionTotals,
    RecentActivity, WorkoutTotals, WorkoutTypeStats,
};
use crate::models::{MealType, NutritionEntry, ProgressEntry, Workout, WorkoutType};

/// Per-kind cap and merged cap for the dashboard activity feed.
pub const RECENT_PER_KIND: i64 = 5;
pub const RECENT_TOTAL: usize = 10;

// ─── Nutrition ───────────────────────────────────────────────

/// Sum macros per UTC day, ascending by date. Days without entries are omitted.
pub fn daily_nutrition(entries: &[NutritionEntry]) -> Vec<DailyNutrition> {
    let mut by_day: BTreeMap<_, DailyNutrition> = BTreeMap::new();
    for e in entries {
        let date = e.date_consumed.date_naive();
        let day = by_day.entry(date).or_insert_with(|| DailyNutrition {
            date,
            ..Default::default()
        });
        day.total_calories += e.calories;
        day.total_protein += e.protein;
        day.total_carbs += e.carbohydrates;
        day.total_fats += e.fats;
    }
    by_day.into_values().collect()
}

/// Calories and entry count per meal type, in meal order.
pub fn meal_type_stats(entries: &[NutritionEntry]) -> Vec<MealTypeStats> {
    [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ]
    .into_iter()
    .filter_map(|meal_type| {
        let matching: Vec<_> = entries.iter().filter(|e| e.meal_type == meal_type).collect();
        (!matching.is_empty()).then(|| MealTypeStats {
            meal_type,
            total_calories: matching.iter().map(|e| e.calories).sum(),
            entry_count: matching.len() as i64,
        })
    })
    .collect()
}

pub fn macro_totals(entries: &[NutritionEntry]) -> MacroTotals {
    entries.iter().fold(MacroTotals::default(), |mut acc, e| {
        acc.calories += e.calories;
        acc.protein += e.protein;
        acc.carbohydrates += e.carbohydrates;
        acc.fats += e.fats;
        acc
    })
}

pub fn nutrition_totals(entries: &[NutritionEntry]) -> NutritionTotals {
    let macros = macro_totals(entries);
    NutritionTotals {
        total_entries: entries.len() as i64,
        total_calories: macros.calories,
        total_protein: macros.protein,
        total_carbs: macros.carbohydrates,
        total_fats: macros.fats,
    }
}

// ─── Workouts ────────────────────────────────────────────────

pub fn daily_workouts(workouts: &[Workout]) -> Vec<DailyWorkouts> {
    let mut by_day: BTreeMap<_, DailyWorkouts> = BTreeMap::new();
    for w in workouts {
        let date = w.date_performed.date_naive();
        let day = by_day.entry(date).or_insert_with(|| DailyWorkouts {
            date,
            ..Default::default()
        });
        day.total_calories_burned += w.calories_burned;
        day.total_duration += w.duration;
        day.workout_count += 1;
    }
    by_day.into_values().collect()
}

pub fn workout_type_stats(workouts: &[Workout]) -> Vec<WorkoutTypeStats> {
    [
        WorkoutType::Cardio,
        WorkoutType::Strength,
        WorkoutType::Flexibility,
        WorkoutType::Sports,
        WorkoutType::Other,
    ]
    .into_iter()
    .filter_map(|workout_type| {
        let matching: Vec<_> = workouts
            .iter()
            .filter(|w| w.workout_type == workout_type)
            .collect();
        (!matching.is_empty()).then(|| WorkoutTypeStats {
            workout_type,
            total_calories_burned: matching.iter().map(|w| w.calories_burned).sum(),
            total_duration: matching.iter().map(|w| w.duration).sum(),
            workout_count: matching.len() as i64,
        })
    })
    .collect()
}

pub fn workout_totals(workouts: &[Workout]) -> WorkoutTotals {
    WorkoutTotals {
        total_workouts: workouts.len() as i64,
        total_calories_burned: workouts.iter().map(|w| w.calories_burned).sum(),
        total_duration: workouts.iter().map(|w| w.duration).sum(),
    }
}

// ─── Progress ────────────────────────────────────────────────

/// Mean weight and mean body fat. Body fat averages only the entries that
/// recorded it.
pub fn body_averages(entries: &[ProgressEntry]) -> BodyAverages {
    if entries.is_empty() {
        return BodyAverages::default();
    }
    let avg_weight = entries.iter().map(|e| e.weight).sum::<f64>() / entries.len() as f64;

    let body_fat: Vec<f64> = entries.iter().filter_map(|e| e.body_fat_percentage).collect();
    let avg_body_fat = if body_fat.is_empty() {
        0.0
    } else {
        body_fat.iter().sum::<f64>() / body_fat.len() as f64
    };

    BodyAverages {
        avg_weight,
        avg_body_fat,
    }
}

/// Weight-loss progress score from the two newest weigh-ins, 0..=100.
///
/// Each 0.1% of body weight lost since the previous entry is one point.
pub fn goal_progress(latest_weight: f64, previous_weight: f64) -> i64 {
    if previous_weight <= 0.0 {
        return 0;
    }
    let raw = (previous_weight - latest_weight) / previous_weight * 1000.0;
    raw.clamp(0.0, 100.0).round() as i64
}

// ─── Dashboard ───────────────────────────────────────────────

/// Merge the newest entries of each kind into one feed, newest first.
pub fn recent_activities(
    workouts: Vec<Workout>,
    nutrition: Vec<NutritionEntry>,
    progress: Vec<ProgressEntry>,
) -> Vec<RecentActivity> {
    let mut feed: Vec<RecentActivity> = workouts
        .into_iter()
        .map(RecentActivity::from)
        .chain(nutrition.into_iter().map(RecentActivity::from))
        .chain(progress.into_iter().map(RecentActivity::from))
        .collect();
    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed.truncate(RECENT_TOTAL);
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Intensity, NewNutritionEntry, NewProgressEntry, NewWorkout, NutritionEntry,
    };
    use crate::models::stats::ActivityKind;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, day, hour, 0, 0).unwrap()
    }

    fn food(meal_type: MealType, calories: f64, protein: f64, when: DateTime<Utc>) -> NutritionEntry {
        NutritionEntry::create(
            Uuid::nil(),
            NewNutritionEntry {
                food_name: "Food".into(),
                calories,
                protein,
                carbohydrates: 10.0,
                fats: 2.0,
                fiber: 0.0,
                sugar: 0.0,
                sodium: 0.0,
                meal_type,
                date_consumed: when,
                portion_size: 1.0,
                portion_unit: "serving".into(),
                notes: None,
            },
            when,
        )
    }

    fn workout(kind: WorkoutType, minutes: i64, calories: f64, when: DateTime<Utc>) -> Workout {
        Workout::create(
            Uuid::nil(),
            NewWorkout {
                workout_type: kind,
                activity_name: "Session".into(),
                duration: minutes,
                calories_burned: calories,
                intensity: Intensity::default(),
                date_performed: when,
                distance: None,
                distance_unit: "km".into(),
                sets: None,
                reps: None,
                weight: None,
                weight_unit: "kg".into(),
                heart_rate_avg: None,
                heart_rate_max: None,
                notes: None,
            },
            when,
        )
    }

    fn weigh_in(weight: f64, body_fat: Option<f64>, when: DateTime<Utc>) -> ProgressEntry {
        ProgressEntry::create(
            Uuid::nil(),
            NewProgressEntry {
                weight,
                body_fat_percentage: body_fat,
                muscle_mass: None,
                waist_circumference: None,
                chest_circumference: None,
                arm_circumference: None,
                thigh_circumference: None,
                progress_date: when,
                notes: None,
                mood: None,
                energy_level: None,
            },
            when,
        )
    }

    #[test]
    fn test_daily_nutrition_groups_by_utc_day() {
        let entries = vec![
            food(MealType::Breakfast, 300.0, 20.0, at(2, 8)),
            food(MealType::Lunch, 600.0, 30.0, at(1, 12)),
            food(MealType::Dinner, 700.0, 40.0, at(2, 19)),
        ];
        let daily = daily_nutrition(&entries);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, at(1, 0).date_naive());
        assert_eq!(daily[0].total_calories, 600.0);
        assert_eq!(daily[1].total_calories, 1000.0);
        assert_eq!(daily[1].total_protein, 60.0);
    }

    #[test]
    fn test_meal_type_stats_skip_empty_meals() {
        let entries = vec![
            food(MealType::Snack, 100.0, 1.0, at(1, 15)),
            food(MealType::Snack, 150.0, 1.0, at(1, 16)),
            food(MealType::Breakfast, 400.0, 1.0, at(1, 7)),
        ];
        let stats = meal_type_stats(&entries);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].meal_type, MealType::Breakfast);
        assert_eq!(stats[1].meal_type, MealType::Snack);
        assert_eq!(stats[1].total_calories, 250.0);
        assert_eq!(stats[1].entry_count, 2);
    }

    #[test]
    fn test_workout_aggregates() {
        let workouts = vec![
            workout(WorkoutType::Cardio, 30, 300.0, at(3, 7)),
            workout(WorkoutType::Strength, 45, 250.0, at(3, 18)),
            workout(WorkoutType::Cardio, 20, 180.0, at(4, 7)),
        ];

        let totals = workout_totals(&workouts);
        assert_eq!(totals.total_workouts, 3);
        assert_eq!(totals.total_duration, 95);
        assert_eq!(totals.total_calories_burned, 730.0);

        let daily = daily_workouts(&workouts);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].workout_count, 2);

        let by_type = workout_type_stats(&workouts);
        assert_eq!(by_type[0].workout_type, WorkoutType::Cardio);
        assert_eq!(by_type[0].total_duration, 50);
    }

    #[test]
    fn test_body_averages() {
        assert_eq!(body_averages(&[]), BodyAverages::default());

        let entries = vec![
            weigh_in(80.0, Some(20.0), at(1, 7)),
            weigh_in(78.0, None, at(2, 7)),
        ];
        let avg = body_averages(&entries);
        assert_eq!(avg.avg_weight, 79.0);
        assert_eq!(avg.avg_body_fat, 20.0);
    }

    #[test]
    fn test_goal_progress() {
        // 1% lost -> 10 points
        assert_eq!(goal_progress(79.2, 80.0), 10);
        // Gains never go negative
        assert_eq!(goal_progress(82.0, 80.0), 0);
        // Capped at 100
        assert_eq!(goal_progress(60.0, 80.0), 100);
        assert_eq!(goal_progress(70.0, 0.0), 0);
    }

    #[test]
    fn test_recent_activities_merged_and_capped() {
        let workouts = (1..=5)
            .map(|d| workout(WorkoutType::Other, 10, 50.0, at(d, 6)))
            .collect();
        let nutrition = (1..=5)
            .map(|d| food(MealType::Lunch, 500.0, 20.0, at(d, 12)))
            .collect();
        let progress = vec![weigh_in(70.0, None, at(10, 9))];

        let feed = recent_activities(workouts, nutrition, progress);
        assert_eq!(feed.len(), RECENT_TOTAL);
        assert_eq!(feed[0].kind, ActivityKind::Progress);
        assert!(feed.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

        let json = serde_json::to_value(&feed[0]).unwrap();
        assert_eq!(json["type"], "progress");
        assert_eq!(json["weight"], 70.0);
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_macro_totals_sum_everything() {
        let entries = vec![
            food(MealType::Lunch, 500.0, 25.0, at(1, 12)),
            food(MealType::Dinner, 800.0, 45.0, at(1, 19) + Duration::minutes(5)),
        ];
        let totals = macro_totals(&entries);
        assert_eq!(totals.calories, 1300.0);
        assert_eq!(totals.protein, 70.0);
        assert_eq!(totals.carbohydrates, 20.0);
        assert_eq!(totals.fats, 4.0);
    }
}
