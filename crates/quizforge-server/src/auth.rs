//! Password hashing, token issuance, and the authenticated-user extractor.

use std::sync::Arc;
use std::time::Duration;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Signing secret and token lifetime.
///
/// Note: Custom Debug impl masks the secret.
#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"***")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: ClaimsUser,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsUser {
    pub id: Uuid,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>, token_ttl: Duration) -> anyhow::Result<Self> {
        let secret = secret.into();
        anyhow::ensure!(
            !secret.trim().is_empty(),
            "JWT secret is not configured; set JWT_SECRET or `jwt_secret` under [server]"
        );
        Ok(Self {
            secret,
            token_ttl,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        })
    }

    /// Override the bcrypt work factor (4..=31).
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn issue_token(&self, user_id: Uuid) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user: ClaimsUser { id: user_id },
            iat: now,
            exp: now + self.token_ttl.as_secs() as i64,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!("failed to sign token: {e}");
            ApiError::Internal("Server error".into())
        })
    }

    /// Decode and check a token's signature and expiry.
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }

    /// Hash a password off the async runtime.
    pub async fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))?
            .map_err(|e| {
                tracing::error!("failed to hash password: {e}");
                ApiError::Internal("Server error".into())
            })
    }

    /// Check a password against a stored hash. A malformed hash never matches.
    pub async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let password = password.to_string();
        let hash = hash.to_string();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))?;
        Ok(verified.unwrap_or_else(|e| {
            tracing::warn!("stored password hash is unreadable: {e}");
            false
        }))
    }
}

/// The user identified by a valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AuthConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(ApiError::Unauthorized("No token, authorization denied"))?;

        let token = header
            .to_str()
            .ok()
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthorized("Invalid token format."))?;

        let auth = Arc::<AuthConfig>::from_ref(state);
        let claims = auth.verify_token(token).map_err(|e| {
            tracing::debug!("rejected token: {e}");
            ApiError::Unauthorized("Token is not valid or expired")
        })?;

        Ok(AuthUser { id: claims.user.id })
    }
}
