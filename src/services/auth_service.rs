use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::auth::{AuthKeys, Session};
use crate::errors::AppError;
use crate::models::{LoginRequest, SessionRecord, SessionResponse, SignupRequest, User, UserRecord};
use crate::store::ProductStore;

pub async fn signup(store: &dyn ProductStore, input: SignupRequest) -> Result<User, AppError> {
    let name = input.name.trim();
    let email = input.email.trim();
    if name.is_empty() || email.is_empty() || input.password.trim().is_empty() {
        return Err(AppError::Validation("All fields are required".into()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email address".into()));
    }

    let password_hash = hash_password(&input.password)?;
    let record = UserRecord::new(email.to_lowercase(), name.to_string(), password_hash);
    Ok(store.insert_user(record).await?)
}

/// Credential check plus session creation: a fresh session row keyed by the
/// token's `jti`, and a signed token carrying the user identity.
pub async fn login(
    store: &dyn ProductStore,
    keys: &AuthKeys,
    input: LoginRequest,
) -> Result<SessionResponse, AppError> {
    let record = store
        .fetch_user_by_email(&input.email.trim().to_lowercase())
        .await?
        .ok_or(AppError::Unauthorized)?;
    verify_password(&input.password, &record.password_hash)?;

    let token_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(keys.session_ttl_hours);
    store
        .insert_session(SessionRecord::new(token_id, record.id, expires_at))
        .await?;
    let token = keys.issue(&record, token_id, expires_at)?;

    Ok(SessionResponse {
        token,
        user: record.into_user(),
    })
}

/// Deletes the caller's session row; the token is dead from here on even if
/// its `exp` claim has not run out.
pub async fn logout(store: &dyn ProductStore, session: &Session) -> Result<(), AppError> {
    let deleted = store.delete_session(session.token_id).await?;
    if deleted == 0 {
        warn!("Logout for already-cleared session {}", session.token_id);
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(e.to_string()))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<(), AppError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AppError::Internal(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AppError::Unauthorized)
        ));
    }
}
