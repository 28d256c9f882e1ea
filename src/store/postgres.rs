use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Product, RawPrice, RawPriceRecord, SessionRecord, User, UserRecord};
use crate::store::{ProductStore, StoreError};

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict("record".to_string());
        }
    }
    StoreError::Database(err.to_string())
}

#[async_trait]
impl ProductStore for PostgresStore {
    async fn fetch_products(&self) -> Result<Vec<Product>, StoreError> {
        sqlx::query_as::<_, Product>(
            "SELECT prodcode AS code, description, unit, created_at
             FROM product
             ORDER BY prodcode ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn fetch_product(&self, code: &str) -> Result<Option<Product>, StoreError> {
        sqlx::query_as::<_, Product>(
            "SELECT prodcode AS code, description, unit, created_at
             FROM product
             WHERE prodcode = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn insert_product(&self, product: Product) -> Result<Product, StoreError> {
        sqlx::query_as::<_, Product>(
            "INSERT INTO product (prodcode, description, unit, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING prodcode AS code, description, unit, created_at",
        )
        .bind(product.code)
        .bind(product.description)
        .bind(product.unit)
        .bind(product.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match map_sqlx(e) {
            StoreError::Conflict(_) => StoreError::Conflict("product".to_string()),
            other => other,
        })
    }

    async fn update_product(
        &self,
        code: &str,
        description: &str,
        unit: &str,
    ) -> Result<Option<Product>, StoreError> {
        sqlx::query_as::<_, Product>(
            "UPDATE product
             SET description = $1, unit = $2
             WHERE prodcode = $3
             RETURNING prodcode AS code, description, unit, created_at",
        )
        .bind(description)
        .bind(unit)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn delete_product(&self, code: &str) -> Result<u64, StoreError> {
        // pricehist rows go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM product WHERE prodcode = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected())
    }

    async fn fetch_price_records(&self, code: &str) -> Result<Vec<RawPriceRecord>, StoreError> {
        // Read back as text: the rows re-enter through the same validation
        // gate as every other source of price data.
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT effdate::text, unitprice::text
             FROM pricehist
             WHERE prodcode = $1
             ORDER BY effdate ASC",
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|(effective_date, unit_price)| RawPriceRecord {
                effective_date,
                unit_price: RawPrice::Text(unit_price),
            })
            .collect())
    }

    async fn insert_price_record(
        &self,
        code: &str,
        date: NaiveDate,
        price: &BigDecimal,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO pricehist (prodcode, effdate, unitprice)
             VALUES ($1, $2, $3)
             ON CONFLICT (prodcode, effdate)
             DO UPDATE SET unitprice = EXCLUDED.unitprice",
        )
        .bind(code)
        .bind(date)
        .bind(price)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn insert_user(&self, user: UserRecord) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, name, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, email, name, created_at",
        )
        .bind(user.id)
        .bind(user.email)
        .bind(user.name)
        .bind(user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match map_sqlx(e) {
            StoreError::Conflict(_) => StoreError::Conflict("account".to_string()),
            other => other,
        })
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, name, password_hash, created_at
             FROM users
             WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn insert_session(&self, session: SessionRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO sessions (token_id, user_id, expires_at, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(session.token_id)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn fetch_session(&self, token_id: Uuid) -> Result<Option<SessionRecord>, StoreError> {
        sqlx::query_as::<_, SessionRecord>(
            "SELECT token_id, user_id, expires_at, created_at
             FROM sessions
             WHERE token_id = $1",
        )
        .bind(token_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)
    }

    async fn delete_session(&self, token_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_id = $1")
            .bind(token_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected())
    }
}
