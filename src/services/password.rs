// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! bcrypt password hashing.
//!
//! Async callers use [`hash_password_blocking`] / [`verify_password_blocking`],
//! which run on tokio's blocking pool.

use anyhow::Context;

/// Hash `raw` with a fresh random salt at work factor `cost`.
pub fn hash_password(raw: &str, cost: u32) -> anyhow::Result<String> {
    bcrypt::hash(raw, cost).context("bcrypt hashing failed")
}

/// Compare `raw` against a stored bcrypt hash.
///
/// A malformed stored hash counts as a mismatch rather than an error.
pub fn verify_password(raw: &str, hash: &str) -> bool {
    match bcrypt::verify(raw, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            false
        }
    }
}

pub async fn hash_password_blocking(raw: String, cost: u32) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&raw, cost))
        .await
        .context("password hashing task panicked")?
}

pub async fn verify_password_blocking(raw: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&raw, &hash))
        .await
        .context("password verification task panicked")
}
