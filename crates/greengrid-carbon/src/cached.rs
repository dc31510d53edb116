//! TTL cache in front of a provider

use crate::{CarbonIntensityProvider, CarbonResult, ForecastPoint};
use async_trait::async_trait;
use greengrid_common::CarbonSample;
use moka::future::Cache;
use std::time::Duration;

/// Caches samples per location; forecasts pass through
pub struct CachedProvider<P> {
    inner: P,
    cache: Cache<String, CarbonSample>,
}

impl<P: CarbonIntensityProvider> CachedProvider<P> {
    /// Wrap `inner`, keeping up to `capacity` samples for `ttl`
    pub fn new(inner: P, ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self { inner, cache }
    }

    /// Drop every cached sample
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl<P: CarbonIntensityProvider> CarbonIntensityProvider for CachedProvider<P> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn carbon_intensity(&self, location: &str) -> CarbonResult<CarbonSample> {
        let key = location.trim().to_ascii_lowercase();
        if let Some(sample) = self.cache.get(&key).await {
            tracing::debug!(location, "carbon sample cache hit");
            return Ok(sample);
        }

        let sample = self.inner.carbon_intensity(location).await?;
        // fallback data must never be served as if measured
        if !sample.is_fallback() {
            self.cache.insert(key, sample.clone()).await;
        }
        Ok(sample)
    }

    async fn forecast(&self, location: &str) -> CarbonResult<Vec<ForecastPoint>> {
        self.inner.forecast(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CarbonError, StaticProvider};
    use greengrid_common::DataSource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl CarbonIntensityProvider for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn carbon_intensity(&self, location: &str) -> CarbonResult<CarbonSample> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CarbonError::RateLimited);
            }
            Ok(CarbonSample::new(location, 200.0, 40.0, DataSource::Static))
        }
    }

    #[tokio::test]
    async fn test_second_call_hits_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CachedProvider::new(
            Counting { calls: calls.clone(), fail: false },
            Duration::from_secs(60),
            100,
        );

        provider.carbon_intensity("Berlin").await.unwrap();
        provider.carbon_intensity(" berlin").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        provider.carbon_intensity("Paris").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CachedProvider::new(
            Counting { calls: calls.clone(), fail: true },
            Duration::from_secs(60),
            100,
        );

        assert!(provider.carbon_intensity("Berlin").await.is_err());
        assert!(provider.carbon_intensity("Berlin").await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_forecast_passthrough() {
        let provider = CachedProvider::new(StaticProvider::new(), Duration::from_secs(60), 10);
        assert_eq!(provider.name(), "static");
        assert_eq!(provider.forecast("Paris").await.unwrap().len(), 24);
    }
}
