//! Event Inbox - Server Entry Point

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use event_inbox::api::{create_router, AppState};
use event_inbox::{Config, EventStore, FileEventStore, MemoryEventStore, StorageKind};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,event_inbox=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(?config, "configuration loaded");

    let store: Arc<dyn EventStore> = match config.storage {
        StorageKind::File => Arc::new(
            FileEventStore::open(config.store_config()).context("Failed to open event store")?,
        ),
        StorageKind::Memory => {
            tracing::warn!("using in-memory event store; events are lost on exit");
            Arc::new(MemoryEventStore::new())
        }
    };

    let app = create_router(Arc::new(AppState::new(store)));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!(%addr, version = event_inbox::VERSION, "event inbox listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("event inbox stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
