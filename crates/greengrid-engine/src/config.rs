//! Engine configuration

use crate::selector::DEFAULT_LOOKUP_CONCURRENCY;
use greengrid_common::{Coordinate, GridResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Deadline for one request, propagated to every outbound fetch
    pub request_timeout_ms: u64,
    /// Alternatives returned when the caller does not ask for a count
    pub default_max_alternatives: usize,
    /// Concurrent per-edge carbon lookups
    pub edge_lookup_concurrency: usize,
    /// User coordinate when neither the request nor the gazetteer has one
    pub default_user_coordinate: Coordinate,
    /// Replace unknown content types with `static` instead of rejecting
    pub substitute_unknown_content_type: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 15_000,
            default_max_alternatives: 5,
            edge_lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
            default_user_coordinate: Coordinate::DEFAULT_USER,
            substitute_unknown_content_type: true,
        }
    }
}

impl EngineConfig {
    /// Request deadline as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> GridResult<()> {
        self.default_user_coordinate.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.default_max_alternatives, 5);
        assert_eq!(config.edge_lookup_concurrency, 8);
        assert_eq!(config.default_user_coordinate, Coordinate::DEFAULT_USER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"requestTimeoutMs": 500, "substituteUnknownContentType": false}"#).unwrap();
        assert_eq!(config.request_timeout_ms, 500);
        assert!(!config.substitute_unknown_content_type);
        assert_eq!(config.default_max_alternatives, 5);
    }

    #[test]
    fn test_invalid_default_coordinate() {
        let config = EngineConfig {
            default_user_coordinate: Coordinate { latitude: 91.0, longitude: 0.0 },
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
