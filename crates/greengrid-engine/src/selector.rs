//! Edge selector
//!
//! Looks up grid intensity for every candidate edge, then hands the
//! complete set to [`EdgeScorer`]. Lookups run on a bounded pool and are
//! keyed by grid zone, so edges sharing a zone cost one fetch.

use crate::scorer::{EdgeCandidate, EdgeScorer};
use crate::EdgeAlternative;
use futures::stream::{self, StreamExt};
use greengrid_carbon::{fallback, CarbonError, CarbonIntensityProvider};
use greengrid_catalog::CdnProvider;
use greengrid_common::{distance_km, CarbonSample, Coordinate, GridResult};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default cap on concurrent per-edge lookups
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 8;

/// Intensity for one grid zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneIntensity {
    /// gCO2/kWh
    pub carbon_intensity: f64,
    /// Value is a fallback estimate
    pub degraded: bool,
}

/// Fetch a sample, bounded by `deadline`. Errors and timeouts are
/// absorbed into a flagged fallback estimate.
pub async fn fetch_sample(
    provider: &dyn CarbonIntensityProvider,
    location: &str,
    deadline: Instant,
) -> CarbonSample {
    let started = Instant::now();
    let result = match tokio::time::timeout_at(deadline, provider.carbon_intensity(location)).await {
        Ok(r) => r,
        Err(_) => Err(CarbonError::Timeout(deadline.saturating_duration_since(started))),
    };

    match result {
        Ok(sample) => sample,
        Err(e) => {
            warn!(location = %location, provider = provider.name(), error = %e, "carbon fetch failed, using fallback estimate");
            fallback::estimate(location)
        }
    }
}

/// Carbon-aware edge selector
pub struct EdgeSelector {
    provider: Arc<dyn CarbonIntensityProvider>,
    concurrency: usize,
}

impl EdgeSelector {
    /// Create selector over a carbon provider
    pub fn new(provider: Arc<dyn CarbonIntensityProvider>) -> Self {
        Self {
            provider,
            concurrency: DEFAULT_LOOKUP_CONCURRENCY,
        }
    }

    /// Set the lookup pool size (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Intensity per zone. The pool size is `min(zones, concurrency)`;
    /// results are keyed, so completion order does not matter.
    pub async fn zone_intensities<I, S>(&self, zones: I, deadline: Instant) -> BTreeMap<String, ZoneIntensity>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let zones: BTreeSet<String> = zones.into_iter().map(Into::into).collect();
        let workers = zones.len().min(self.concurrency).max(1);

        // each lookup owns its zone and provider handle so the stream stays Send
        let lookups: Vec<_> = zones
            .into_iter()
            .map(|zone| {
                let provider = Arc::clone(&self.provider);
                async move {
                    let sample = fetch_sample(provider.as_ref(), &zone, deadline).await;
                    debug!(zone = %zone, intensity = sample.carbon_intensity, source = %sample.source, "edge zone lookup");
                    let intensity = ZoneIntensity {
                        carbon_intensity: sample.carbon_intensity,
                        degraded: sample.is_fallback(),
                    };
                    (zone, intensity)
                }
            })
            .collect();

        stream::iter(lookups).buffer_unordered(workers).collect().await
    }

    /// Every edge of `provider` with its intensity and distance from `user`
    pub async fn candidates<'a>(
        &self,
        user: &Coordinate,
        provider: &'a CdnProvider,
        deadline: Instant,
    ) -> GridResult<Vec<EdgeCandidate<'a>>> {
        let edges = provider.edges();
        let intensities = self
            .zone_intensities(edges.iter().map(|e| e.grid_zone_id.as_str()), deadline)
            .await;

        edges
            .into_iter()
            .map(|edge| {
                let zone = intensities
                    .get(edge.grid_zone_id.as_str())
                    .copied()
                    .unwrap_or_else(|| ZoneIntensity {
                        carbon_intensity: fallback::estimate(&edge.grid_zone_id).carbon_intensity,
                        degraded: true,
                    });

                Ok(EdgeCandidate {
                    edge,
                    carbon_intensity: zone.carbon_intensity,
                    distance_km: distance_km(user, &edge.coordinate)?,
                    degraded: zone.degraded,
                })
            })
            .collect()
    }

    /// Best-scoring edge of `provider` for a user at `user`
    pub async fn optimal_edge(
        &self,
        user: &Coordinate,
        provider: &CdnProvider,
        deadline: Instant,
    ) -> GridResult<EdgeAlternative> {
        let candidates = self.candidates(user, provider, deadline).await?;
        let best = EdgeScorer::optimal(&candidates)?;

        debug!(
            provider = %provider.name,
            edge = %best.edge.id,
            intensity = best.carbon_intensity,
            distance_km = best.distance_km,
            "optimal edge selected"
        );
        Ok(best.to_alternative(&provider.name))
    }

    /// Edges of `provider` at least 20% cleaner than `current_intensity`,
    /// cleanest first
    pub async fn alternatives(
        &self,
        user: &Coordinate,
        provider: &CdnProvider,
        current_edge_id: Option<&str>,
        current_intensity: f64,
        max_results: usize,
        deadline: Instant,
    ) -> GridResult<Vec<EdgeAlternative>> {
        let candidates = self.candidates(user, provider, deadline).await?;

        Ok(EdgeScorer::alternatives(&candidates, current_edge_id, current_intensity, max_results)
            .iter()
            .map(|c| c.to_alternative(&provider.name))
            .collect())
    }
}

impl std::fmt::Debug for EdgeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeSelector")
            .field("provider", &self.provider.name())
            .field("concurrency", &self.concurrency)
            .finish()
    }
}
