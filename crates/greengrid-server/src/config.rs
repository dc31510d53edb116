//! Server configuration

use greengrid_carbon::{CachedProvider, CarbonError, CarbonIntensityProvider, ElectricityMapsClient, StaticProvider, ELECTRICITY_MAPS_API};
use greengrid_common::GridError;
use greengrid_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Env var naming the config file
pub const CONFIG_ENV: &str = "GREENGRID_CONFIG";
/// Config file used when `GREENGRID_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "/etc/greengrid/server.json";
/// Env var overriding the Electricity Maps token
pub const TOKEN_ENV: &str = "ELECTRICITY_MAPS_TOKEN";

const SAMPLE_CACHE_CAPACITY: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] GridError),
    #[error("carbon provider: {0}")]
    Provider(#[from] CarbonError),
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,
    /// Engine settings
    pub engine: EngineConfig,
    /// Carbon data source
    pub provider: ProviderConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            engine: EngineConfig::default(),
            provider: ProviderConfig::default(),
        }
    }
}

/// Carbon data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProviderConfig {
    /// Live data, cached
    #[serde(rename_all = "camelCase")]
    ElectricityMaps {
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default)]
        api_token: Option<String>,
        #[serde(default = "default_cache_ttl")]
        cache_ttl_secs: u64,
    },
    /// Built-in zone baselines
    Static,
}

fn default_base_url() -> String {
    ELECTRICITY_MAPS_API.to_string()
}

fn default_cache_ttl() -> u64 {
    300
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::ElectricityMaps {
            base_url: default_base_url(),
            api_token: None,
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

impl ServerConfig {
    /// Load from a JSON file
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Load from `GREENGRID_CONFIG`, falling back to defaults when the
    /// file is missing, then apply `ELECTRICITY_MAPS_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());

        let config = match Self::load(&path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path, "config not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };

        Ok(config.with_token(std::env::var(TOKEN_ENV).ok()))
    }

    /// Override the Electricity Maps token. Blank tokens are ignored.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
            return self;
        };
        if let ProviderConfig::ElectricityMaps { api_token, .. } = &mut self.provider {
            *api_token = Some(token);
        }
        self
    }

    /// Build the configured carbon provider. Electricity Maps without a
    /// token degrades to the static provider.
    pub fn build_provider(&self) -> Result<Arc<dyn CarbonIntensityProvider>, ConfigError> {
        match &self.provider {
            ProviderConfig::ElectricityMaps { base_url, api_token: Some(token), cache_ttl_secs } => {
                let client = ElectricityMapsClient::new(Some(token.clone()))?.with_base_url(base_url.clone());
                Ok(Arc::new(CachedProvider::new(
                    client,
                    Duration::from_secs(*cache_ttl_secs),
                    SAMPLE_CACHE_CAPACITY,
                )))
            }
            ProviderConfig::ElectricityMaps { api_token: None, .. } => {
                tracing::warn!("no Electricity Maps token configured, using static baselines");
                Ok(Arc::new(StaticProvider::new()))
            }
            ProviderConfig::Static => Ok(Arc::new(StaticProvider::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.engine, EngineConfig::default());
        assert!(matches!(config.provider, ProviderConfig::ElectricityMaps { api_token: None, .. }));
    }

    #[test]
    fn test_parse_json() {
        let config: ServerConfig = serde_json::from_str(
            r#"{
                "bindAddr": "127.0.0.1:9000",
                "engine": {"requestTimeoutMs": 2000},
                "provider": {"type": "electricityMaps", "apiToken": "abc", "cacheTtlSecs": 60}
            }"#,
        )
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.engine.request_timeout_ms, 2000);
        assert_eq!(
            config.provider,
            ProviderConfig::ElectricityMaps {
                base_url: ELECTRICITY_MAPS_API.into(),
                api_token: Some("abc".into()),
                cache_ttl_secs: 60,
            }
        );

        let config: ServerConfig = serde_json::from_str(r#"{"provider": {"type": "static"}}"#).unwrap();
        assert_eq!(config.provider, ProviderConfig::Static);
    }

    #[test]
    fn test_token_override() {
        let config = ServerConfig::default().with_token(Some("secret".into()));
        assert!(matches!(
            config.provider,
            ProviderConfig::ElectricityMaps { api_token: Some(ref t), .. } if t == "secret"
        ));

        let unchanged = ServerConfig::default().with_token(Some("  ".into()));
        assert_eq!(unchanged, ServerConfig::default());
    }

    #[test]
    fn test_provider_selection() {
        assert_eq!(ServerConfig::default().build_provider().unwrap().name(), "static");

        let live = ServerConfig::default().with_token(Some("secret".into()));
        assert_eq!(live.build_provider().unwrap().name(), "electricity-maps");
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ServerConfig::load("/nonexistent/greengrid.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
