//! Electricity Maps API Integration
//!
//! Fetches live and forecast grid carbon intensity per zone.

use crate::{CarbonError, CarbonIntensityProvider, CarbonResult, ForecastPoint};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use greengrid_catalog::resolve_zone;
use greengrid_common::{CarbonSample, DataSource};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Electricity Maps API base URL
pub const ELECTRICITY_MAPS_API: &str = "https://api.electricitymap.org/v3";

/// `carbon-intensity/latest` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestIntensity {
    zone: String,
    carbon_intensity: Option<f64>,
    datetime: DateTime<Utc>,
}

/// `power-breakdown/latest` response (only the field we use)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PowerBreakdown {
    renewable_percentage: Option<f64>,
}

/// `carbon-intensity/forecast` response
#[derive(Debug, Clone, Deserialize)]
struct IntensityForecast {
    forecast: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastEntry {
    carbon_intensity: f64,
    datetime: DateTime<Utc>,
}

/// Electricity Maps client
pub struct ElectricityMapsClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl ElectricityMapsClient {
    /// Create new client with a 10s per-request timeout
    pub fn new(api_token: Option<String>) -> CarbonResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("greengrid/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: ELECTRICITY_MAPS_API.to_string(),
            api_token,
        })
    }

    /// Point at another deployment (self-hosted proxy, sandbox)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn zone_for(location: &str) -> CarbonResult<&'static str> {
        resolve_zone(location).map_err(|_| CarbonError::UnknownLocation(location.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, zone: &str) -> CarbonResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, zone, "Electricity Maps request");

        let mut request = self.client.get(&url).query(&[("zone", zone)]);
        if let Some(token) = &self.api_token {
            request = request.header("auth-token", token.as_str());
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(CarbonError::RateLimited),
            status if !status.is_success() => Err(CarbonError::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            }),
            _ => response
                .json::<T>()
                .await
                .map_err(|e| CarbonError::Parse(e.to_string())),
        }
    }
}

#[async_trait]
impl CarbonIntensityProvider for ElectricityMapsClient {
    fn name(&self) -> &'static str {
        "electricity-maps"
    }

    async fn carbon_intensity(&self, location: &str) -> CarbonResult<CarbonSample> {
        let zone = Self::zone_for(location)?;

        let (latest, breakdown) = tokio::join!(
            self.get_json::<LatestIntensity>("carbon-intensity/latest", zone),
            self.get_json::<PowerBreakdown>("power-breakdown/latest", zone),
        );

        let latest = latest?;
        let intensity = latest
            .carbon_intensity
            .ok_or_else(|| CarbonError::Parse(format!("no carbon intensity for zone {}", latest.zone)))?;

        // renewable share is best-effort
        let renewable = match breakdown {
            Ok(b) => b.renewable_percentage.unwrap_or(0.0),
            Err(e) => {
                tracing::debug!(zone, error = %e, "power breakdown unavailable");
                0.0
            }
        };

        Ok(CarbonSample::new(location, intensity, renewable, DataSource::ElectricityMaps)
            .captured_at(latest.datetime))
    }

    async fn forecast(&self, location: &str) -> CarbonResult<Vec<ForecastPoint>> {
        let zone = Self::zone_for(location)?;
        let body = self
            .get_json::<IntensityForecast>("carbon-intensity/forecast", zone)
            .await?;

        let mut points: Vec<_> = body
            .forecast
            .into_iter()
            .map(|f| ForecastPoint {
                datetime: f.datetime,
                carbon_intensity: f.carbon_intensity,
            })
            .collect();
        points.sort_by_key(|p| p.datetime);
        Ok(points)
    }
}
