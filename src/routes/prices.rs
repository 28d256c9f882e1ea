use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::auth::Session;
use crate::errors::AppError;
use crate::models::{LatestPrice, NewObservation, PricePoint};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:code", get(get_prices).post(record_observation))
        .route("/:code/latest", get(get_latest_price))
}

pub async fn get_prices(
    Path(code): Path<String>,
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<Vec<PricePoint>>, AppError> {
    info!("GET /api/prices/{} - Price history for {}", code, session.email);
    let prices = services::price_service::get_history(state.store.as_ref(), &code)
        .await
        .map_err(|e| {
            error!("Failed to get price history for {}: {}", code, e);
            e
        })?;
    Ok(Json(prices))
}

pub async fn get_latest_price(
    Path(code): Path<String>,
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<LatestPrice>, AppError> {
    info!("GET /api/prices/{}/latest - Latest price for {}", code, session.email);
    let price = services::price_service::get_latest(state.store.as_ref(), &code)
        .await
        .map_err(|e| {
            error!("Failed to get latest price for {}: {}", code, e);
            e
        })?;
    Ok(Json(price))
}

pub async fn record_observation(
    Path(code): Path<String>,
    session: Session,
    State(state): State<AppState>,
    Json(data): Json<NewObservation>,
) -> Result<(StatusCode, Json<Vec<PricePoint>>), AppError> {
    info!("POST /api/prices/{} - {} recording observation", code, session.email);
    let series = services::price_service::record_observation(state.store.as_ref(), &code, data)
        .await
        .map_err(|e| {
            error!("Failed to record observation for {}: {}", code, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(series)))
}
