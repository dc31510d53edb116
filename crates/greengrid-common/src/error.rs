//! Error types for GreenGrid

use thiserror::Error;

/// GreenGrid error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Latitude/longitude outside the valid range or not finite
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// Offending latitude
        latitude: f64,
        /// Offending longitude
        longitude: f64,
    },

    /// Content type without a registered weight profile
    #[error("unknown content type: {0}")]
    UnknownContentType(String),

    /// CDN provider not present in the catalog
    #[error("unknown CDN provider: {0}")]
    UnknownCdnProvider(String),

    /// Candidate set empty after filtering
    #[error("no suitable edge: {0}")]
    NoSuitableEdge(String),

    /// Location name that cannot be resolved to a grid zone
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// Carbon-data provider failure or timeout
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(String),
}

impl GridError {
    /// Whether the error was caused by caller input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinate { .. }
                | Self::UnknownContentType(_)
                | Self::UnknownCdnProvider(_)
                | Self::UnknownLocation(_)
        )
    }

    /// Stable machine-readable kind, used in JSON error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCoordinate { .. } => "invalid_coordinate",
            Self::UnknownContentType(_) => "unknown_content_type",
            Self::UnknownCdnProvider(_) => "unknown_cdn_provider",
            Self::NoSuitableEdge(_) => "no_suitable_edge",
            Self::UnknownLocation(_) => "unknown_location",
            Self::UpstreamFetch(_) => "upstream_fetch",
        }
    }
}

/// Result type for GreenGrid
pub type GridResult<T> = Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(GridError::UnknownContentType("xml".into()).is_client_error());
        assert!(GridError::UnknownCdnProvider("acme".into()).is_client_error());
        assert!(GridError::InvalidCoordinate { latitude: 91.0, longitude: 0.0 }.is_client_error());
        assert!(!GridError::NoSuitableEdge("empty".into()).is_client_error());
        assert!(!GridError::UpstreamFetch("timeout".into()).is_client_error());
    }

    #[test]
    fn test_error_display() {
        let err = GridError::InvalidCoordinate { latitude: 95.0, longitude: 10.0 };
        assert_eq!(err.to_string(), "invalid coordinate: latitude 95, longitude 10");
        assert_eq!(err.kind(), "invalid_coordinate");
    }
}
