use chrono::Utc;
use tracing::error;

use crate::errors::AppError;
use crate::models::{LatestPrice, NewObservation, PricePoint};
use crate::services::price_series;
use crate::store::ProductStore;

/// Validated, chronologically ordered price history for one product.
pub async fn get_history(
    store: &dyn ProductStore,
    code: &str,
) -> Result<Vec<PricePoint>, AppError> {
    store.fetch_product(code).await?.ok_or(AppError::NotFound)?;
    let raw = store.fetch_price_records(code).await.map_err(|e| {
        error!("Failed to fetch price records for {}: {}", code, e);
        AppError::from(e)
    })?;
    Ok(price_series::normalize(&price_series::parse_observations(
        &raw,
    )?))
}

/// The most recent observation. An empty series is NotFound, never a zero.
pub async fn get_latest(store: &dyn ProductStore, code: &str) -> Result<LatestPrice, AppError> {
    let history = get_history(store, code).await?;
    match (history.last(), price_series::current_price(&history)) {
        (Some(point), Some(price)) => Ok(LatestPrice {
            code: code.to_string(),
            effective_date: point.date,
            price,
        }),
        _ => Err(AppError::NotFound),
    }
}

/// Record one observation for an existing product, dated today unless the
/// caller supplies an effective date. Returns the extended series so the
/// chart layer can redraw without a second fetch.
pub async fn record_observation(
    store: &dyn ProductStore,
    code: &str,
    input: NewObservation,
) -> Result<Vec<PricePoint>, AppError> {
    let history = get_history(store, code).await?;
    let date = input.effective_date.unwrap_or_else(|| Utc::now().date_naive());
    store
        .insert_price_record(code, date, &input.unit_price)
        .await
        .map_err(|e| {
            error!("Failed to record observation for {}: {}", code, e);
            AppError::from(e)
        })?;
    Ok(price_series::append_observation(
        &history,
        PricePoint {
            date,
            price: input.unit_price,
        },
    ))
}
