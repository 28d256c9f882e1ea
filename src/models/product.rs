use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::PricePoint;

// A catalog entry. `code` is the natural key; `unit` doubles as the
// category label shown in the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Product {
    pub fn new(code: String, description: String, unit: String) -> Self {
        Self {
            code,
            description,
            unit,
            created_at: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub price: BigDecimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProduct {
    pub description: String,
    pub unit: String,
    pub price: Option<BigDecimal>,
}

/// A product joined with its reconciled price series: what the dashboard
/// list and detail pages render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub current_price: Option<BigDecimal>,
    pub price_history: Vec<PricePoint>,
}
