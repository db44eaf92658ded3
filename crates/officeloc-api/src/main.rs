use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use officeloc_store::postgres::{PostgresConfig, PostgresStore};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use officeloc_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "officeloc_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();

    tracing::info!(
        port = config.port,
        default_srid = %config.default_srid,
        postgres = config.uses_postgres(),
        "Starting officeloc API server"
    );

    let state = match &config.database_url {
        Some(database_url) => {
            tracing::info!("DATABASE_URL found, connecting to PostgreSQL...");
            let store = init_postgres_storage(database_url).await.map_err(|e| {
                tracing::error!("Failed to connect to PostgreSQL: {:#}", e);
                tracing::error!(
                    "Remediation:\n\
                    1. Ensure PostgreSQL is running\n\
                    2. Verify DATABASE_URL is correct\n\
                    3. Run `CREATE EXTENSION postgis;` in the target database"
                );
                e
            })?;
            tracing::info!("Connected to PostgreSQL");
            AppState::new(store.clone(), store, config.default_srid)
        }
        None => {
            tracing::info!("Using in-memory storage (set DATABASE_URL for PostgreSQL)");
            AppState::in_memory(config.default_srid)
        }
    };

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid OFFICELOC_CORS_ORIGIN '{}'", config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(Arc::new(state)).layer(cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Connect to PostgreSQL and run the install hook
async fn init_postgres_storage(database_url: &str) -> Result<Arc<PostgresStore>> {
    let config = PostgresConfig::new(database_url.to_string()).context("Invalid DATABASE_URL")?;

    PostgresStore::with_install(config).await.map(Arc::new).context("Connection failed")
}
