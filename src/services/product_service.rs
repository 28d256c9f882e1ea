use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use tracing::error;

use crate::errors::AppError;
use crate::models::{CreateProduct, Product, ProductView, UpdateProduct};
use crate::services::price_series;
use crate::store::ProductStore;

/// All products with their reconciled series, optionally narrowed by the
/// dashboard's search box semantics: case-insensitive substring match on
/// code, description or unit.
pub async fn list(
    store: &dyn ProductStore,
    search: Option<&str>,
) -> Result<Vec<ProductView>, AppError> {
    let products = store.fetch_products().await?;
    let filtered: Vec<Product> = match search.map(str::trim) {
        Some(term) if !term.is_empty() => products
            .into_iter()
            .filter(|p| matches_search(p, term))
            .collect(),
        _ => products,
    };

    let mut views = Vec::with_capacity(filtered.len());
    for product in filtered {
        views.push(build_view(store, product).await?);
    }
    Ok(views)
}

pub async fn create(store: &dyn ProductStore, input: CreateProduct) -> Result<ProductView, AppError> {
    let code = input.code.trim();
    let description = input.description.trim();
    let unit = input.unit.trim();
    if code.is_empty() || description.is_empty() || unit.is_empty() {
        return Err(AppError::Validation("All fields are required".into()));
    }
    if input.price <= BigDecimal::zero() {
        return Err(AppError::Validation("Price must be greater than zero".into()));
    }

    let product = store
        .insert_product(Product::new(
            code.to_string(),
            description.to_string(),
            unit.to_string(),
        ))
        .await?;

    // the entered price becomes the first observation, effective today
    store
        .insert_price_record(&product.code, Utc::now().date_naive(), &input.price)
        .await?;

    build_view(store, product).await
}

pub async fn detail(store: &dyn ProductStore, code: &str) -> Result<ProductView, AppError> {
    let product = store.fetch_product(code).await?.ok_or(AppError::NotFound)?;
    build_view(store, product).await
}

pub async fn update(
    store: &dyn ProductStore,
    code: &str,
    input: UpdateProduct,
) -> Result<ProductView, AppError> {
    let description = input.description.trim();
    let unit = input.unit.trim();
    if description.is_empty() || unit.is_empty() {
        return Err(AppError::Validation("All fields are required".into()));
    }
    if let Some(price) = &input.price {
        if *price <= BigDecimal::zero() {
            return Err(AppError::Validation("Price must be greater than zero".into()));
        }
    }

    let product = store
        .update_product(code, description, unit)
        .await?
        .ok_or(AppError::NotFound)?;

    // an edited price is a fresh observation dated today, not a rewrite of
    // the history
    if let Some(price) = input.price {
        store
            .insert_price_record(&product.code, Utc::now().date_naive(), &price)
            .await?;
    }

    build_view(store, product).await
}

pub async fn delete(store: &dyn ProductStore, code: &str) -> Result<u64, AppError> {
    match store.delete_product(code).await {
        Ok(0) => Err(AppError::NotFound),
        Ok(n) => Ok(n),
        Err(e) => {
            error!("Failed to delete product {}: {}", code, e);
            Err(AppError::from(e))
        }
    }
}

async fn build_view(store: &dyn ProductStore, product: Product) -> Result<ProductView, AppError> {
    let raw = store.fetch_price_records(&product.code).await?;
    let history = price_series::normalize(&price_series::parse_observations(&raw)?);
    let current_price = price_series::current_price(&history);
    Ok(ProductView {
        code: product.code,
        description: product.description,
        unit: product.unit,
        created_at: product.created_at,
        current_price,
        price_history: history,
    })
}

fn matches_search(product: &Product, term: &str) -> bool {
    let term = term.to_lowercase();
    product.code.to_lowercase().contains(&term)
        || product.description.to_lowercase().contains(&term)
        || product.unit.to_lowercase().contains(&term)
}
