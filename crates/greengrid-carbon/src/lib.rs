//! Carbon intensity providers
//!
//! One capability, [`CarbonIntensityProvider`], with concrete
//! implementations chosen at construction time:
//!
//! - [`ElectricityMapsClient`] - live grid data over HTTP
//! - [`StaticProvider`] - in-memory baselines, optional delays/failures
//! - [`CachedProvider`] - TTL cache in front of any provider
//!
//! [`fallback::estimate`] builds the flagged synthetic sample used when
//! a provider fails.

mod baseline;
mod cached;
mod electricity_maps;
pub mod fallback;
mod static_provider;

pub use baseline::{baseline, daily_factor, ZoneBaseline, BASELINES};
pub use cached::CachedProvider;
pub use electricity_maps::{ElectricityMapsClient, ELECTRICITY_MAPS_API};
pub use static_provider::StaticProvider;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use greengrid_common::{CarbonSample, GridError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Provider errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CarbonError {
    /// Transport failure before a response arrived
    #[error("request failed: {0}")]
    Request(String),
    /// Non-success HTTP status
    #[error("unexpected HTTP status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },
    /// Response body did not decode
    #[error("parse error: {0}")]
    Parse(String),
    /// Location maps to no grid zone
    #[error("unknown location: {0}")]
    UnknownLocation(String),
    /// Upstream answered 429
    #[error("rate limited")]
    RateLimited,
    /// Lookup exceeded its deadline
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    /// Provider has no forecast endpoint
    #[error("forecast not supported by {0}")]
    ForecastUnsupported(&'static str),
}

/// Result type for provider calls
pub type CarbonResult<T> = std::result::Result<T, CarbonError>;

impl From<reqwest::Error> for CarbonError {
    fn from(e: reqwest::Error) -> Self {
        CarbonError::Request(e.to_string())
    }
}

impl From<CarbonError> for GridError {
    fn from(e: CarbonError) -> Self {
        GridError::UpstreamFetch(e.to_string())
    }
}

/// One forecast point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Start of the hour this point covers
    pub datetime: DateTime<Utc>,
    /// Predicted intensity in gCO2/kWh
    pub carbon_intensity: f64,
}

/// Source of carbon intensity data.
///
/// Implementations may cache, rate-limit or retry internally; callers
/// treat them as a black box that can fail or hang.
#[async_trait]
pub trait CarbonIntensityProvider: Send + Sync {
    /// Provider name for logs and health output
    fn name(&self) -> &'static str;

    /// Current intensity for a city name or grid-zone id
    async fn carbon_intensity(&self, location: &str) -> CarbonResult<CarbonSample>;

    /// Hourly forecast, earliest first
    async fn forecast(&self, _location: &str) -> CarbonResult<Vec<ForecastPoint>> {
        Err(CarbonError::ForecastUnsupported(self.name()))
    }
}

#[async_trait]
impl<P: CarbonIntensityProvider + ?Sized> CarbonIntensityProvider for Arc<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn carbon_intensity(&self, location: &str) -> CarbonResult<CarbonSample> {
        (**self).carbon_intensity(location).await
    }

    async fn forecast(&self, location: &str) -> CarbonResult<Vec<ForecastPoint>> {
        (**self).forecast(location).await
    }
}
