use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{auth, health, prices, products};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/products", products::router())
        .nest("/api/prices", prices::router())
        // browser dashboards are the consumers
        .layer(CorsLayer::permissive())
        .with_state(state)
}
