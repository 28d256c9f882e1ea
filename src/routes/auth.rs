use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::auth::Session;
use crate::errors::AppError;
use crate::models::{LoginRequest, SessionResponse, SignupRequest, User};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/session", get(session))
        .route("/logout", post(logout))
}

pub async fn signup(
    State(state): State<AppState>,
    Json(data): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    info!("POST /api/auth/signup - Creating account");
    let user = services::auth_service::signup(state.store.as_ref(), data)
        .await
        .map_err(|e| {
            error!("Failed to create account: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(data): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    info!("POST /api/auth/login - Logging in");
    let response = services::auth_service::login(state.store.as_ref(), &state.auth, data)
        .await
        .map_err(|e| {
            error!("Login failed: {}", e);
            e
        })?;
    Ok(Json(response))
}

pub async fn session(session: Session) -> Json<Session> {
    info!("GET /api/auth/session - Session for {}", session.email);
    Json(session)
}

pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<StatusCode, AppError> {
    info!("POST /api/auth/logout - Logging out {}", session.email);
    services::auth_service::logout(state.store.as_ref(), &session)
        .await
        .map_err(|e| {
            error!("Logout failed for {}: {}", session.email, e);
            e
        })?;
    Ok(StatusCode::OK)
}
