//! In-memory provider
//!
//! Serves zone baselines, with per-location overrides. Artificial delays
//! and forced failures make it the workhorse for tests and for running
//! without an API token.

use crate::baseline::{baseline, daily_factor};
use crate::{CarbonError, CarbonIntensityProvider, CarbonResult, ForecastPoint};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, DurationRound, Timelike, Utc};
use greengrid_catalog::resolve_zone;
use greengrid_common::{CarbonSample, DataSource};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Static carbon intensity provider
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    /// lowercase location or zone → (intensity, renewable %)
    overrides: HashMap<String, (f64, f64)>,
    delays: HashMap<String, Duration>,
    failures: HashSet<String>,
    fail_all: bool,
}

impl StaticProvider {
    /// Provider serving the baseline table
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose every call fails
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Fixed sample for a city name or zone id
    pub fn with_sample(mut self, location: &str, intensity: f64, renewable: f64) -> Self {
        self.overrides.insert(key(location), (intensity, renewable));
        self
    }

    /// Sleep before answering for this location
    pub fn with_delay(mut self, location: &str, delay: Duration) -> Self {
        self.delays.insert(key(location), delay);
        self
    }

    /// Fail every call for this location
    pub fn with_failure(mut self, location: &str) -> Self {
        self.failures.insert(key(location));
        self
    }

    async fn simulate(&self, location: &str) -> CarbonResult<()> {
        let k = key(location);
        if let Some(delay) = self.delays.get(&k) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_all || self.failures.contains(&k) {
            return Err(CarbonError::Request(format!("simulated failure for {location}")));
        }
        Ok(())
    }

    /// (intensity, renewable) for a location: exact override, then zone
    /// override, then zone baseline.
    fn lookup(&self, location: &str) -> CarbonResult<(f64, f64)> {
        if let Some(v) = self.overrides.get(&key(location)) {
            return Ok(*v);
        }

        let zone = resolve_zone(location)
            .map_err(|_| CarbonError::UnknownLocation(location.to_string()))?;

        if let Some(v) = self.overrides.get(&key(zone)) {
            return Ok(*v);
        }

        baseline(zone)
            .map(|b| (b.intensity, b.renewable))
            .ok_or_else(|| CarbonError::UnknownLocation(location.to_string()))
    }
}

fn key(location: &str) -> String {
    location.trim().to_ascii_lowercase()
}

#[async_trait]
impl CarbonIntensityProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn carbon_intensity(&self, location: &str) -> CarbonResult<CarbonSample> {
        self.simulate(location).await?;
        let (intensity, renewable) = self.lookup(location)?;
        Ok(CarbonSample::new(location, intensity, renewable, DataSource::Static))
    }

    /// 24 hourly points starting next full hour, following the daily curve
    async fn forecast(&self, location: &str) -> CarbonResult<Vec<ForecastPoint>> {
        self.simulate(location).await?;
        let (intensity, _) = self.lookup(location)?;

        let now = Utc::now();
        let start = now
            .duration_trunc(ChronoDuration::hours(1))
            .map_err(|e| CarbonError::Parse(e.to_string()))?
            + ChronoDuration::hours(1);

        Ok((0..24)
            .map(|i| {
                let datetime = start + ChronoDuration::hours(i);
                ForecastPoint {
                    datetime,
                    carbon_intensity: intensity * daily_factor(datetime.hour()),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_baseline_lookup() {
        let provider = StaticProvider::new();
        let sample = assert_ok!(provider.carbon_intensity("Stockholm").await);
        assert_eq!(sample.carbon_intensity, 25.0);
        assert_eq!(sample.source, DataSource::Static);

        let by_zone = assert_ok!(provider.carbon_intensity("FR").await);
        assert_eq!(by_zone.carbon_intensity, 56.0);
    }

    #[tokio::test]
    async fn test_overrides() {
        let provider = StaticProvider::new()
            .with_sample("Berlin", 120.0, 60.0)
            .with_sample("DE", 300.0, 50.0);

        assert_eq!(provider.carbon_intensity("berlin").await.unwrap().carbon_intensity, 120.0);
        // Frankfurt shares the DE zone override
        assert_eq!(provider.carbon_intensity("Frankfurt").await.unwrap().carbon_intensity, 300.0);
    }

    #[tokio::test]
    async fn test_failures() {
        let provider = StaticProvider::new().with_failure("Berlin");
        assert_err!(provider.carbon_intensity("Berlin").await);
        assert_ok!(provider.carbon_intensity("Paris").await);

        let all = StaticProvider::failing();
        assert_err!(all.carbon_intensity("Paris").await);

        assert_eq!(
            StaticProvider::new().carbon_intensity("Atlantis").await,
            Err(CarbonError::UnknownLocation("Atlantis".into()))
        );
    }

    #[tokio::test]
    async fn test_delay() {
        let provider = StaticProvider::new().with_delay("Paris", Duration::from_millis(50));
        let start = std::time::Instant::now();
        assert_ok!(provider.carbon_intensity("Paris").await);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_forecast_shape() {
        let provider = StaticProvider::new();
        let points = assert_ok!(provider.forecast("Berlin").await);
        assert_eq!(points.len(), 24);
        assert!(points[0].datetime > Utc::now());
        assert!(points.windows(2).all(|w| w[1].datetime - w[0].datetime == ChronoDuration::hours(1)));
        let min = points.iter().map(|p| p.carbon_intensity).fold(f64::MAX, f64::min);
        assert!((min - 380.0 * 0.85).abs() < 1e-6);
    }
}
