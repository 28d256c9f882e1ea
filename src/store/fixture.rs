use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{Product, RawPrice, RawPriceRecord, SessionRecord, User, UserRecord};
use crate::store::{ProductStore, StoreError};

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password";

#[derive(Default)]
struct FixtureInner {
    products: HashMap<String, Product>,
    prices: HashMap<String, Vec<RawPriceRecord>>,
    users: HashMap<Uuid, UserRecord>,
    sessions: HashMap<Uuid, SessionRecord>,
}

/// In-memory stand-in for the real datastore, preloaded with the demo
/// catalog. Selected with `PRODUCT_STORE=fixture`; also the test double for
/// everything above the store trait.
pub struct FixtureStore {
    inner: RwLock<FixtureInner>,
}

impl FixtureStore {
    pub fn empty() -> Self {
        Self {
            inner: RwLock::new(FixtureInner::default()),
        }
    }

    pub fn seeded() -> Self {
        let store = Self::empty();
        {
            let mut inner = store.inner.write();
            for (code, description, unit, created, history) in demo_catalog() {
                inner.products.insert(
                    code.to_string(),
                    Product {
                        code: code.to_string(),
                        description: description.to_string(),
                        unit: unit.to_string(),
                        created_at: created,
                    },
                );
                inner.prices.insert(
                    code.to_string(),
                    history
                        .into_iter()
                        .map(|(date, price)| RawPriceRecord {
                            effective_date: date.to_string(),
                            unit_price: RawPrice::Text(price.to_string()),
                        })
                        .collect(),
                );
            }

            let demo = UserRecord::new(
                DEMO_EMAIL.to_string(),
                "Demo User".to_string(),
                hash_demo_password(),
            );
            inner.users.insert(demo.id, demo);
        }
        store
    }
}

fn hash_demo_password() -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(DEMO_PASSWORD.as_bytes(), &salt)
        .expect("hash demo password")
        .to_string()
}

fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

type SeedProduct = (
    &'static str,
    &'static str,
    &'static str,
    DateTime<Utc>,
    Vec<(&'static str, &'static str)>,
);

fn demo_catalog() -> Vec<SeedProduct> {
    vec![
        (
            "Wireless Headphones",
            "Premium noise-cancelling wireless headphones with 30-hour battery life.",
            "Electronics",
            seed_date(2023, 1, 1),
            vec![
                ("2023-01-01", "249.99"),
                ("2023-02-15", "229.99"),
                ("2023-04-10", "199.99"),
            ],
        ),
        (
            "Smart Watch",
            "Fitness tracker and smartwatch with heart rate monitoring and GPS.",
            "Electronics",
            seed_date(2023, 1, 1),
            vec![
                ("2023-01-01", "179.99"),
                ("2023-03-15", "159.99"),
                ("2023-05-10", "149.99"),
            ],
        ),
        (
            "Ergonomic Office Chair",
            "Adjustable office chair with lumbar support and breathable mesh back.",
            "Furniture",
            seed_date(2023, 1, 1),
            vec![
                ("2023-01-01", "299.99"),
                ("2023-02-01", "279.99"),
                ("2023-04-15", "249.99"),
            ],
        ),
        (
            "Coffee Maker",
            "Programmable coffee maker with thermal carafe and auto shut-off feature.",
            "Kitchen",
            seed_date(2023, 1, 1),
            vec![
                ("2023-01-01", "99.99"),
                ("2023-03-01", "89.99"),
                ("2023-05-01", "79.99"),
            ],
        ),
    ]
}

#[async_trait]
impl ProductStore for FixtureStore {
    async fn fetch_products(&self) -> Result<Vec<Product>, StoreError> {
        let inner = self.inner.read();
        let mut products: Vec<Product> = inner.products.values().cloned().collect();
        products.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(products)
    }

    async fn fetch_product(&self, code: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.inner.read().products.get(code).cloned())
    }

    async fn insert_product(&self, product: Product) -> Result<Product, StoreError> {
        let mut inner = self.inner.write();
        if inner.products.contains_key(&product.code) {
            return Err(StoreError::Conflict("product".to_string()));
        }
        inner.prices.entry(product.code.clone()).or_default();
        inner.products.insert(product.code.clone(), product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        code: &str,
        description: &str,
        unit: &str,
    ) -> Result<Option<Product>, StoreError> {
        let mut inner = self.inner.write();
        Ok(inner.products.get_mut(code).map(|product| {
            product.description = description.to_string();
            product.unit = unit.to_string();
            product.clone()
        }))
    }

    async fn delete_product(&self, code: &str) -> Result<u64, StoreError> {
        let mut inner = self.inner.write();
        inner.prices.remove(code);
        Ok(inner.products.remove(code).map_or(0, |_| 1))
    }

    async fn fetch_price_records(&self, code: &str) -> Result<Vec<RawPriceRecord>, StoreError> {
        let inner = self.inner.read();
        let mut records = inner.prices.get(code).cloned().unwrap_or_default();
        // ISO dates sort chronologically as strings
        records.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Ok(records)
    }

    async fn insert_price_record(
        &self,
        code: &str,
        date: NaiveDate,
        price: &BigDecimal,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let records = inner.prices.entry(code.to_string()).or_default();
        let effective_date = date.format("%Y-%m-%d").to_string();
        let record = RawPriceRecord {
            effective_date: effective_date.clone(),
            unit_price: RawPrice::Text(price.to_string()),
        };
        match records
            .iter_mut()
            .find(|r| r.effective_date == effective_date)
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        Ok(())
    }

    async fn insert_user(&self, user: UserRecord) -> Result<User, StoreError> {
        let mut inner = self.inner.write();
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("account".to_string()));
        }
        inner.users.insert(user.id, user.clone());
        Ok(user.into_user())
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.read();
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_session(&self, session: SessionRecord) -> Result<(), StoreError> {
        self.inner.write().sessions.insert(session.token_id, session);
        Ok(())
    }

    async fn fetch_session(&self, token_id: Uuid) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self.inner.read().sessions.get(&token_id).cloned())
    }

    async fn delete_session(&self, token_id: Uuid) -> Result<u64, StoreError> {
        Ok(self.inner.write().sessions.remove(&token_id).map_or(0, |_| 1))
    }
}
