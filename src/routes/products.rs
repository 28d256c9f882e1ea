use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::auth::Session;
use crate::errors::AppError;
use crate::models::{CreateProduct, ProductView, UpdateProduct};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:code", get(get_product))
        .route("/:code", put(update_product))
        .route("/:code", delete(delete_product))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    search: Option<String>,
}

pub async fn list_products(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ProductView>>, AppError> {
    info!(
        "GET /api/products - Listing products for {} (search: {:?})",
        session.email, params.search
    );
    let products = services::product_service::list(state.store.as_ref(), params.search.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to list products: {}", e);
            e
        })?;
    Ok(Json(products))
}

#[axum::debug_handler]
pub async fn create_product(
    State(state): State<AppState>,
    session: Session,
    Json(data): Json<CreateProduct>,
) -> Result<Json<ProductView>, AppError> {
    info!("POST /api/products - {} creating product", session.email);
    let product = services::product_service::create(state.store.as_ref(), data)
        .await
        .map_err(|e| {
            error!("Failed to create product: {}", e);
            e
        })?;
    Ok(Json(product))
}

pub async fn get_product(
    State(state): State<AppState>,
    session: Session,
    Path(code): Path<String>,
) -> Result<Json<ProductView>, AppError> {
    info!("GET /api/products/{} - Fetching product for {}", code, session.email);
    let product = services::product_service::detail(state.store.as_ref(), &code)
        .await
        .map_err(|e| {
            error!("Failed to fetch product {}: {}", code, e);
            e
        })?;
    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    session: Session,
    Path(code): Path<String>,
    Json(data): Json<UpdateProduct>,
) -> Result<Json<ProductView>, AppError> {
    info!("PUT /api/products/{} - {} updating product", code, session.email);
    let product = services::product_service::update(state.store.as_ref(), &code, data)
        .await
        .map_err(|e| {
            error!("Failed to update product {}: {}", code, e);
            e
        })?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    session: Session,
    Path(code): Path<String>,
) -> Result<Json<()>, AppError> {
    info!("DELETE /api/products/{} - {} deleting product", code, session.email);
    match services::product_service::delete(state.store.as_ref(), &code).await {
        Ok(_) => Ok(Json(())),
        Err(e) => {
            error!("Failed to delete product {}: {}", code, e);
            Err(e)
        }
    }
}
