use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One observed price for a product, effective on a calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: BigDecimal,
}

/// A price value as the datastore hands it back: historically either a
/// numeric column rendered as text or a bare JSON number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

/// One unvalidated price row for a product. Nothing here is trusted until it
/// has passed through `services::price_series::parse_observations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPriceRecord {
    pub effective_date: String,
    pub unit_price: RawPrice,
}

// The most recent observation in a product's series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestPrice {
    pub code: String,
    pub effective_date: NaiveDate,
    pub price: BigDecimal,
}

// Payload for recording a new observation. A missing date means "today".
#[derive(Debug, Deserialize)]
pub struct NewObservation {
    pub effective_date: Option<NaiveDate>,
    pub unit_price: BigDecimal,
}
