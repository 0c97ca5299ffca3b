//! Flowscope Server - Main Entry Point

use flowscope::{build_router, ModelStore, ServerConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("flowscope v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env();

    // All three artifacts must load before we bind; a broken model set
    // must never reach a ready state.
    let store = Arc::new(ModelStore::load(&config.model_dir)?);

    let app = build_router(store);

    tracing::info!("flowscope listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
