//! # Questboard Binary
//!
//! The entry point that assembles the application from compile-time features
//! and runtime settings.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{build_router, AppState};
use configs::{Settings, StoreBackend};
use services::{Services, Stores};
use storage_adapters::MemoryStore;
use tracing_subscriber::EnvFilter;

// Feature-gated imports: the durable store is compiled to order
#[cfg(feature = "db-sqlite")]
use storage_adapters::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;
    init_tracing(settings.log_json);

    // 1. Initialize the store implementation
    let stores = open_stores(&settings).await?;

    // 2. Wire services and routes (dynamic dispatch over the ports)
    let state = AppState::new(Services::new(stores), settings.ranking_limit);
    let app = build_router(state, settings.body_limit_bytes());

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, store = ?settings.store, "questboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("questboard stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn open_stores(settings: &Settings) -> anyhow::Result<Stores> {
    match settings.store {
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store; data is lost on restart");
            Ok(Stores::shared(Arc::new(MemoryStore::new())))
        }
        #[cfg(feature = "db-sqlite")]
        StoreBackend::Sqlite => {
            let store = SqliteStore::connect(&settings.database_url)
                .await
                .with_context(|| format!("failed to open {}", settings.database_url))?;
            Ok(Stores::shared(Arc::new(store)))
        }
        #[cfg(not(feature = "db-sqlite"))]
        StoreBackend::Sqlite => anyhow::bail!("store `sqlite` requires the `db-sqlite` feature"),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        // without a signal handler the server runs until killed
        std::future::pending::<()>().await;
    }
}
