mod config;
mod models;
mod storage;
mod tracking;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use config::{Config, DatabaseBackend};
use storage::{PostgresStorage, SqliteStorage, Storage};

const MAX_DB_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration; a missing DATABASE_URL aborts here, before any
    // listener is bound
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    let storage: Arc<dyn Storage> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.database.url);
            Arc::new(SqliteStorage::new(&config.database.url, MAX_DB_CONNECTIONS).await?)
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage: {}", config.database.url);
            Arc::new(PostgresStorage::new(&config.database.url, MAX_DB_CONNECTIONS).await?)
        }
    };

    // Ensure the events table exists before serving any request
    storage
        .init()
        .await
        .context("failed to initialize database schema")?;
    info!("Database initialized successfully");

    let router = tracking::create_router(Arc::clone(&storage), config.tracking.signup_url.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Tracking server listening on http://{}", addr);
    info!("   - Open beacon at http://{}/track_open", addr);
    info!("   - Tracked links at http://{}/track_click", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
