// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store: account creation and password checks on top of the
//! database.
//!
//! Passwords are hashed before any row is built, so a user record never
//! exists with a plaintext password.

use crate::db::Database;
use crate::error::AppError;
use crate::models::{
    ActivityLevel, FitnessGoal, Gender, Notification, User, UserPreferences,
};
use crate::services::password::{hash_password_blocking, verify_password_blocking};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

/// Registration input after request validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub height: f64,
    pub weight: f64,
    pub gender: Gender,
    pub fitness_goal: FitnessGoal,
    pub activity_level: ActivityLevel,
}

/// Lowercase and trim an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct CredentialStore {
    db: Database,
    bcrypt_cost: u32,
}

impl CredentialStore {
    pub fn new(db: Database, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    /// Create a user, rejecting a taken email or username.
    pub async fn create(&self, registration: Registration) -> Result<User, AppError> {
        let email = normalize_email(&registration.email);
        let username = registration.username.trim().to_string();

        if self.db.user_exists(&email, &username).await? {
            tracing::info!(username = %username, "Registration rejected: duplicate user");
            return Err(AppError::DuplicateUser);
        }

        let password_hash = hash_password_blocking(registration.password, self.bcrypt_cost).await?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            first_name: registration.first_name.trim().to_string(),
            last_name: registration.last_name.trim().to_string(),
            date_of_birth: registration.date_of_birth,
            height: registration.height,
            weight: registration.weight,
            gender: registration.gender,
            fitness_goal: registration.fitness_goal,
            activity_level: registration.activity_level,
            profile_image: None,
            is_verified: false,
            last_login: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let preferences = UserPreferences::defaults(user.id, now);
        let welcome = Notification::welcome(user.id, &user.first_name, now);
        self.db.create_account(&user, &preferences, &welcome).await?;

        Ok(user)
    }

    /// Check `raw` against the user's stored hash.
    pub async fn verify_password(&self, user: &User, raw: &str) -> Result<bool, AppError> {
        Ok(verify_password_blocking(raw.to_string(), user.password_hash.clone()).await?)
    }

    /// Look up by email and check the password. `None` covers both an
    /// unknown email and a wrong password.
    pub async fn authenticate(&self, email: &str, raw: &str) -> Result<Option<User>, AppError> {
        let Some(user) = self.db.get_user_by_email(&normalize_email(email)).await? else {
            return Ok(None);
        };
        if !self.verify_password(&user, raw).await? {
            return Ok(None);
        }
        Ok(Some(user))
    }

    /// Re-hash and store a new password.
    pub async fn update_password(&self, user: &User, new_raw: &str) -> Result<(), AppError> {
        let hash = hash_password_blocking(new_raw.to_string(), self.bcrypt_cost).await?;
        if !self.db.set_password_hash(user.id, &hash, Utc::now()).await? {
            return Err(AppError::NotFound("User".to_string()));
        }
        tracing::info!(user_id = %user.id, "Password updated");
        Ok(())
    }
}
