// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixtures shared by unit tests.

use crate::db::Database;
use crate::models::{ActivityLevel, FitnessGoal, Gender, Notification, User, UserPreferences};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

/// A user row with placeholder profile data. The hash is not a real bcrypt
/// hash; tests needing password checks go through `CredentialStore`.
pub fn sample_user(name: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        username: name.to_string(),
        email: format!("{}@example.com", name),
        password_hash: "not-a-real-hash".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        height: 180.0,
        weight: 80.0,
        gender: Gender::Other,
        fitness_goal: FitnessGoal::default(),
        activity_level: ActivityLevel::default(),
        profile_image: None,
        is_verified: false,
        last_login: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Create an account the way registration does and return its id.
pub async fn seed_user(db: &Database, name: &str) -> Uuid {
    let user = sample_user(name);
    let now = user.created_at;
    db.create_account(
        &user,
        &UserPreferences::defaults(user.id, now),
        &Notification::welcome(user.id, &user.first_name, now),
    )
    .await
    .unwrap();
    user.id
}
