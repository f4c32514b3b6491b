//! # Authentication Module
//!
//! Bearer-token authentication for the dashboard API.
//!
//! Instead of a process-wide "current user", every handler that needs to know
//! who is calling takes a [`Session`] argument. The session is extracted per
//! request from the `Authorization` header and checked against the Argon2
//! hash held in [`ApiState`].

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use bookdesk_core::errors::BookingError;
use eyre::Result;

use crate::{middleware::error_handling::AppError, ApiState};

/// Who is making the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// No token hash is configured, so the API is open.
    Anonymous,
    /// The caller presented the configured dashboard token.
    Dashboard,
}

impl Session {
    pub fn actor(&self) -> &'static str {
        match self {
            Session::Anonymous => "anonymous",
            Session::Dashboard => "dashboard",
        }
    }
}

/// Hashes a token using the Argon2 algorithm
///
/// Produces the PHC string to put in `API_TOKEN_HASH`.
///
/// # Security Notes
///
/// - Uses a random salt for each token
/// - Uses default Argon2 parameters
pub fn hash_token(token: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(token.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing token: {}", e))?
        .to_string();

    Ok(hash)
}

/// Checks a presented token against a stored PHC hash.
///
/// A malformed hash is an error, a wrong token is `Ok(false)`.
pub fn verify_token(token: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| eyre::eyre!("Invalid token hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(token.as_bytes(), &parsed)
        .is_ok())
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(hash) = state.token_hash.as_deref() else {
            return Ok(Session::Anonymous);
        };

        let token = bearer_token(parts).ok_or_else(|| {
            AppError(BookingError::Authentication(
                "Missing bearer token".to_string(),
            ))
        })?;

        // Argon2 is CPU and memory heavy, keep it off the async workers
        let (token, hash) = (token.to_string(), hash.to_string());
        let valid = tokio::task::spawn_blocking(move || verify_token(&token, &hash))
            .await
            .map_err(|e| AppError(BookingError::Internal(e.into())))?
            .map_err(|e| AppError(BookingError::Internal(e.into())))?;

        if !valid {
            tracing::warn!("Rejected request with invalid bearer token");
            return Err(AppError(BookingError::Authentication(
                "Invalid bearer token".to_string(),
            )));
        }

        Ok(Session::Dashboard)
    }
}
