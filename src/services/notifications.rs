// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Threshold-rule reminders and merging with stored notifications.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::models::{
    Notification, NotificationKind, NotificationView, NutritionEntry, Priority, ProgressEntry,
    UserPreferences, Workout,
};
use crate::time_utils::{start_of_day, start_of_week};

/// Daily protein below this (but above zero) triggers a reminder.
pub const PROTEIN_TARGET_GRAMS: f64 = 50.0;
/// Days without a progress entry before a check-in reminder.
pub const PROGRESS_REMINDER_DAYS: i64 = 7;

/// Inputs for reminder generation.
///
/// `workouts` and `nutrition` must cover at least the current week and the
/// current day respectively; older rows are ignored.
pub struct ReminderContext<'a> {
    pub now: DateTime<Utc>,
    pub preferences: &'a UserPreferences,
    pub workouts: &'a [Workout],
    pub nutrition: &'a [NutritionEntry],
    pub latest_progress: Option<&'a ProgressEntry>,
}

fn reminder(
    key: String,
    kind: NotificationKind,
    title: &str,
    message: String,
    priority: Priority,
    metadata: serde_json::Value,
    now: DateTime<Utc>,
) -> NotificationView {
    NotificationView {
        id: None,
        key,
        kind,
        title: title.to_string(),
        message,
        priority,
        is_read: false,
        metadata: Some(metadata),
        expires_at: None,
        created_at: now,
        generated: true,
    }
}

/// Evaluate the reminder rules. Returns nothing when goal reminders are off.
pub fn generate(ctx: &ReminderContext<'_>) -> Vec<NotificationView> {
    let prefs = ctx.preferences;
    if !prefs.goal_reminders {
        return Vec::new();
    }

    let now = ctx.now;
    let today = start_of_day(now);
    let today_label = today.format("%Y-%m-%d");
    let mut out = Vec::new();

    if !ctx.workouts.iter().any(|w| w.date_performed >= today) {
        out.push(reminder(
            format!("workout-reminder-{}", today_label),
            NotificationKind::Reminder,
            "Time for a workout!",
            "You haven't logged any exercise today. Stay consistent with your fitness goals."
                .to_string(),
            Priority::High,
            json!({ "reminderType": "daily_workout" }),
            now,
        ));
    }

    let protein_today: f64 = ctx
        .nutrition
        .iter()
        .filter(|n| n.date_consumed >= today)
        .map(|n| n.protein)
        .sum();
    if protein_today > 0.0 && protein_today < PROTEIN_TARGET_GRAMS {
        out.push(reminder(
            format!("protein-reminder-{}", today_label),
            NotificationKind::Nutrition,
            "Protein Intake Low",
            format!(
                "You've consumed {:.1}g protein today. Aim for at least {}g for optimal muscle recovery.",
                protein_today, PROTEIN_TARGET_GRAMS
            ),
            Priority::Medium,
            json!({ "currentProtein": protein_today, "goalProtein": PROTEIN_TARGET_GRAMS }),
            now,
        ));
    }

    if let Some(last) = ctx.latest_progress {
        let days_since = (now - last.progress_date).num_days();
        if days_since >= PROGRESS_REMINDER_DAYS {
            out.push(reminder(
                format!("progress-reminder-{}", last.progress_date.format("%Y-%m-%d")),
                NotificationKind::Progress,
                "Progress Check",
                format!(
                    "It's been {} days since your last progress update. Track your measurements to see your progress!",
                    days_since
                ),
                Priority::Medium,
                json!({ "daysSinceLastProgress": days_since }),
                now,
            ));
        }
    }

    let week_start = start_of_week(now);
    let this_week = ctx
        .workouts
        .iter()
        .filter(|w| w.date_performed >= week_start)
        .count() as i64;
    if prefs.weekly_reports && this_week >= prefs.weekly_workout_goal {
        out.push(reminder(
            format!("weekly-goal-{}", week_start.format("%Y-%m-%d")),
            NotificationKind::Achievement,
            "Weekly Goal Achieved!",
            format!(
                "Great job! You've completed {} workouts this week (goal: {}). Keep up the momentum!",
                this_week, prefs.weekly_workout_goal
            ),
            Priority::Low,
            json!({ "completedWorkouts": this_week, "weeklyGoal": prefs.weekly_workout_goal }),
            now,
        ));
    }

    out
}

/// Combine stored rows with generated reminders.
///
/// The first item seen for a key wins, and stored rows are seen first. The
/// result is ordered by priority, then newest first.
pub fn merge(stored: Vec<Notification>, generated: Vec<NotificationView>) -> Vec<NotificationView> {
    let mut merged: Vec<NotificationView> = Vec::with_capacity(stored.len() + generated.len());
    for view in stored
        .into_iter()
        .map(NotificationView::from)
        .chain(generated)
    {
        if !merged.iter().any(|m| m.key == view.key) {
            merged.push(view);
        }
    }

    merged.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    merged
}

pub fn unread_count(notifications: &[NotificationView]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}
