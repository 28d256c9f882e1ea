pub mod fixture;
pub mod postgres;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Product, RawPriceRecord, SessionRecord, User, UserRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("{0} already exists")]
    Conflict(String),
}

/// The single data-access seam of the service.
///
/// Two adapters implement it: `postgres::PostgresStore` against the real
/// datastore and `fixture::FixtureStore` over the in-memory demo catalog.
/// Which one runs is a startup configuration choice; nothing above this
/// trait knows the difference.
///
/// Price records come back in their raw wire shape on purpose: every path
/// into the charting layer goes through the same validation gate in
/// `services::price_series`.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>, StoreError>;
    async fn fetch_product(&self, code: &str) -> Result<Option<Product>, StoreError>;
    async fn insert_product(&self, product: Product) -> Result<Product, StoreError>;
    async fn update_product(
        &self,
        code: &str,
        description: &str,
        unit: &str,
    ) -> Result<Option<Product>, StoreError>;
    /// Deletes the product and its price history. Returns affected rows.
    async fn delete_product(&self, code: &str) -> Result<u64, StoreError>;

    async fn fetch_price_records(&self, code: &str) -> Result<Vec<RawPriceRecord>, StoreError>;
    /// Records an observation. A second observation on the same date
    /// replaces the first (last write wins).
    async fn insert_price_record(
        &self,
        code: &str,
        date: NaiveDate,
        price: &BigDecimal,
    ) -> Result<(), StoreError>;

    async fn insert_user(&self, user: UserRecord) -> Result<User, StoreError>;
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn insert_session(&self, session: SessionRecord) -> Result<(), StoreError>;
    async fn fetch_session(&self, token_id: Uuid) -> Result<Option<SessionRecord>, StoreError>;
    async fn delete_session(&self, token_id: Uuid) -> Result<u64, StoreError>;
}
