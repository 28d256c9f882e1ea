use anyhow::Context;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::UserRecord;
use crate::state::AppState;

/// Signing material and session policy, built once at startup.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    pub session_ttl_hours: i64,
}

impl AuthKeys {
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let session_ttl_hours = std::env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);
        Ok(Self::from_secret(&secret, session_ttl_hours))
    }

    pub fn from_secret(secret: &str, session_ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            session_ttl_hours,
        }
    }

    pub fn issue(
        &self,
        user: &UserRecord,
        token_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: user.id.to_string(),
            jti: token_id.to_string(),
            exp: expires_at.timestamp() as usize,
            email: user.email.clone(),
            name: user.name.clone(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub jti: String,
    pub exp: usize,
    pub email: String,
    pub name: String,
}

/// The authenticated caller, threaded explicitly through every protected
/// handler. Created at login, resolved per request from the bearer token
/// plus its live session row, and gone once logout deletes that row.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user_id: Uuid,
    pub token_id: Uuid,
    pub email: String,
    pub name: String,
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

        let claims = state.auth.verify(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;
        let token_id = Uuid::parse_str(&claims.jti).map_err(|_| AppError::Unauthorized)?;

        let record = state
            .store
            .fetch_session(token_id)
            .await?
            .ok_or(AppError::Unauthorized)?;
        if record.expires_at <= Utc::now() {
            let _ = state.store.delete_session(token_id).await;
            return Err(AppError::Unauthorized);
        }

        Ok(Session {
            user_id,
            token_id,
            email: claims.email,
            name: claims.name,
        })
    }
}
