//! Token issuing and verification

use chrono::{Duration, Utc};
use rand::RngCore;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::auth::TokenClaims,
};

#[derive(Clone)]
pub struct AuthService {
    username: Arc<str>,
    password: Arc<str>,
    secret: Arc<str>,
    expiration: Duration,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let expiration = config
            .jwt_expiration()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let secret = match config.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => secret.to_string(),
            _ => {
                tracing::warn!(
                    "No JWT secret configured, generated a random one: issued tokens will not survive a restart"
                );
                generate_secret()
            }
        };

        Ok(Self {
            username: config.username.as_str().into(),
            password: config.password.as_str().into(),
            secret: secret.into(),
            expiration,
        })
    }

    /// Check the credential pair and return a signed bearer token.
    ///
    /// The error never tells which of the two fields was wrong.
    pub fn issue_token(&self, username: &str, password: &str) -> AppResult<String> {
        let username_ok = constant_time_eq(username, &self.username);
        let password_ok = constant_time_eq(password, &self.password);
        if !(username_ok & password_ok) {
            tracing::warn!("Rejected token request: invalid credentials");
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        let claims = TokenClaims::new(username, Utc::now(), self.expiration);
        let token = claims
            .create_token(&self.secret)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        tracing::info!(subject = %claims.sub, "Token issued");
        Ok(token)
    }

    /// Verify a raw bearer token (signature, algorithm family, expiry)
    pub fn verify_token(&self, token: &str) -> AppResult<TokenClaims> {
        TokenClaims::from_token(token, &self.secret).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Authentication("Invalid or expired token".to_string())
        })
    }
}

fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    // ct_eq on slices of different length is false without leaking where they differ
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
