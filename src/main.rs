use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use pricewatch_backend::app::create_app;
use pricewatch_backend::auth::AuthKeys;
use pricewatch_backend::logging::{init_logging, LoggingConfig};
use pricewatch_backend::state::AppState;
use pricewatch_backend::store::fixture::FixtureStore;
use pricewatch_backend::store::postgres::PostgresStore;
use pricewatch_backend::store::ProductStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_logging(LoggingConfig::from_env())?;

    let auth = AuthKeys::from_env()?;

    // Select the datastore backend based on PRODUCT_STORE (defaults to postgres)
    let store_name =
        std::env::var("PRODUCT_STORE").unwrap_or_else(|_| "postgres".to_string());

    let store: Arc<dyn ProductStore> = match store_name.to_lowercase().as_str() {
        "postgres" => {
            let database_url =
                std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&database_url)
                .await?;
            sqlx::migrate!().run(&pool).await?;
            tracing::info!("Using product store: postgres");
            Arc::new(PostgresStore::new(pool))
        }
        "fixture" => {
            tracing::info!("Using product store: in-memory fixtures");
            Arc::new(FixtureStore::seeded())
        }
        other => {
            anyhow::bail!(
                "Invalid PRODUCT_STORE: {}. Must be 'postgres' or 'fixture'",
                other
            );
        }
    };

    let state = AppState { store, auth };
    let app = create_app(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Pricewatch backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
