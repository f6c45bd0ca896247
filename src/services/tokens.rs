// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access and refresh token issuance and verification (HS256 JWT).
//!
//! The two token classes use separate secrets, so an access token never
//! verifies as a refresh token and vice versa.

use crate::config::Config;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// JWT claims carried by both token classes.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Unique token id; makes every issued token distinct
    pub jti: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Malformed, mis-signed or expired. Deliberately not more specific.
    #[error("invalid token")]
    Invalid,

    #[error("access and refresh secrets must differ")]
    SharedSecret,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Freshly issued token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl KeyPair {
    fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

/// Issues and verifies tokens. Built once from [`Config`].
pub struct TokenService {
    access: KeyPair,
    refresh: KeyPair,
    validation: Validation,
}

impl TokenService {
    pub fn new(
        access_secret: &[u8],
        access_ttl: Duration,
        refresh_secret: &[u8],
        refresh_ttl: Duration,
    ) -> Result<Self, TokenError> {
        if access_secret == refresh_secret {
            return Err(TokenError::SharedSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Ok(Self {
            access: KeyPair::new(access_secret, access_ttl),
            refresh: KeyPair::new(refresh_secret, refresh_ttl),
            validation,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TokenError> {
        Self::new(
            &config.jwt_secret,
            config.access_token_ttl,
            &config.jwt_refresh_secret,
            config.refresh_token_ttl,
        )
    }

    pub fn issue_access_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        sign(&self.access, user_id)
    }

    pub fn issue_refresh_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        sign(&self.refresh, user_id)
    }

    pub fn issue_pair(&self, user_id: Uuid) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(user_id)?,
            refresh_token: self.issue_refresh_token(user_id)?,
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &self.access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &self.refresh)
    }

    fn verify(&self, token: &str, keys: &KeyPair) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                TokenError::Invalid
            })
    }
}

fn sign(keys: &KeyPair, user_id: Uuid) -> Result<String, TokenError> {
    let now = jsonwebtoken::get_current_timestamp();
    let claims = Claims {
        user_id,
        iat: now,
        exp: now + keys.ttl.as_secs(),
        jti: Uuid::new_v4(),
    };
    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &keys.encoding,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::from_config(&Config::test_default()).unwrap()
    }

    fn expired_token(secret: &[u8], user_id: Uuid) -> String {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims {
            user_id,
            iat: now - 7200,
            exp: now - 3600,
            jti: Uuid::new_v4(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn test_access_token_round_trip() {
        let tokens = service();
        let user_id = Uuid::new_v4();
        let token = tokens.issue_access_token(user_id).unwrap();
        let claims = tokens.verify_access(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_token_classes_do_not_cross_verify() {
        let tokens = service();
        let user_id = Uuid::new_v4();

        let access = tokens.issue_access_token(user_id).unwrap();
        let refresh = tokens.issue_refresh_token(user_id).unwrap();

        assert!(tokens.verify_refresh(&access).is_err());
        assert!(tokens.verify_access(&refresh).is_err());
        assert!(tokens.verify_refresh(&refresh).is_ok());
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens = service();
        let user_id = Uuid::new_v4();
        let a = tokens.issue_access_token(user_id).unwrap();
        let b = tokens.issue_access_token(user_id).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = Config::test_default();
        let tokens = TokenService::from_config(&config).unwrap();
        let token = expired_token(&config.jwt_secret, Uuid::new_v4());
        assert!(matches!(tokens.verify_access(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = service();
        let token = tokens.issue_access_token(Uuid::new_v4()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_sig = "AAAA".repeat(11);
        parts[2] = &forged_sig;
        assert!(tokens.verify_access(&parts.join(".")).is_err());
        assert!(tokens.verify_access("not.a.jwt").is_err());
        assert!(tokens.verify_access("").is_err());
    }

    #[test]
    fn test_shared_secret_rejected() {
        let ttl = Duration::from_secs(60);
        assert!(matches!(
            TokenService::new(b"same", ttl, b"same", ttl),
            Err(TokenError::SharedSecret)
        ));
    }
}
