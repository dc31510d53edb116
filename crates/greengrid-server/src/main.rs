//! GreenGrid server - Main Entry Point

use greengrid_server::{build_state, start_server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("GreenGrid server v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env()?;
    let state = build_state(&config)?;

    start_server(&config.bind_addr, state).await?;

    Ok(())
}
