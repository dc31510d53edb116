//! GreenGrid server
//!
//! JSON HTTP surface for the dual-grid engine: configuration loading,
//! carbon provider construction and the axum router.

pub mod api;
pub mod config;

pub use api::{create_router, start_server, AppState};
pub use config::{ConfigError, ProviderConfig, ServerConfig};

use greengrid_engine::DualGridService;
use std::sync::Arc;

/// Build application state from configuration
pub fn build_state(config: &ServerConfig) -> Result<Arc<AppState>, ConfigError> {
    config.engine.validate()?;
    let provider = config.build_provider()?;
    tracing::info!(provider = provider.name(), "carbon provider ready");

    let service = DualGridService::new(provider, config.engine.clone());
    Ok(Arc::new(AppState::new(service)))
}
