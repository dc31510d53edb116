//! Dual-grid orchestration
//!
//! Request flow:
//! 1. Resolve content type, CDN provider and coordinates (client errors
//!    surface here, before any I/O)
//! 2. Fetch user and edge samples concurrently, both bounded by the
//!    request deadline
//! 3. Blend, select alternatives, recommend
//! 4. For deferred delivery, attach a green window from the forecast
//!
//! Upstream failures never fail a request. They turn into flagged
//! fallback estimates and `degraded = true`.

use crate::config::EngineConfig;
use crate::recommend::RecommendationEngine;
use crate::scorer::clamp_requested;
use crate::selector::{fetch_sample, EdgeSelector};
use crate::weights::DualGridCalculator;
use crate::{Action, DualGridResult, EdgeAlternative};
use chrono::Utc;
use greengrid_carbon::CarbonIntensityProvider;
use greengrid_catalog::{resolve_coordinate, resolve_zone, CdnProvider, CdnProviderSummary, EdgeCatalog, EdgeLocation};
use greengrid_common::{distance_km, ContentType, Coordinate, GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Per-request context carrying the caller's deadline
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    deadline: Instant,
}

impl RequestContext {
    /// Deadline `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
        }
    }

    /// Explicit deadline
    pub fn with_deadline(deadline: Instant) -> Self {
        Self { deadline }
    }

    /// Deadline
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

/// Dual-grid request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualGridRequest {
    /// User location (city name or grid zone)
    pub user_location: String,
    /// Edge location (city name, grid zone, or an edge id of `cdn_provider`)
    pub edge_location: String,
    /// Content type key
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// CDN provider whose edges are considered as alternatives
    #[serde(default)]
    pub cdn_provider: Option<String>,
    /// Explicit user position
    #[serde(default)]
    pub user_coordinate: Option<Coordinate>,
    /// Explicit edge position
    #[serde(default)]
    pub edge_coordinate: Option<Coordinate>,
    /// Requested alternative count, clamped into [1, 20]
    #[serde(default)]
    pub max_alternatives: Option<i64>,
}

fn default_content_type() -> String {
    ContentType::Static.as_str().to_string()
}

impl DualGridRequest {
    /// Request between two named locations
    pub fn new(user_location: impl Into<String>, edge_location: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            user_location: user_location.into(),
            edge_location: edge_location.into(),
            content_type: content_type.into(),
            cdn_provider: None,
            user_coordinate: None,
            edge_coordinate: None,
            max_alternatives: None,
        }
    }

    /// Consider this provider's edges as alternatives
    pub fn with_cdn_provider(mut self, provider: impl Into<String>) -> Self {
        self.cdn_provider = Some(provider.into());
        self
    }

    /// Explicit coordinates for both sides
    pub fn with_coordinates(mut self, user: Coordinate, edge: Coordinate) -> Self {
        self.user_coordinate = Some(user);
        self.edge_coordinate = Some(edge);
        self
    }

    /// Requested alternative count
    pub fn with_max_alternatives(mut self, max: i64) -> Self {
        self.max_alternatives = Some(max);
        self
    }
}

/// Resolved content type plus whether it was substituted
#[derive(Debug, Clone, Copy)]
struct ResolvedContentType {
    content_type: ContentType,
    substituted: bool,
}

/// Composes the dual-grid pipeline
pub struct DualGridService {
    provider: Arc<dyn CarbonIntensityProvider>,
    catalog: &'static EdgeCatalog,
    selector: EdgeSelector,
    config: EngineConfig,
}

impl DualGridService {
    /// Create service over a carbon provider and the built-in catalog
    pub fn new(provider: Arc<dyn CarbonIntensityProvider>, config: EngineConfig) -> Self {
        let selector = EdgeSelector::new(provider.clone()).with_concurrency(config.edge_lookup_concurrency);

        Self {
            provider,
            catalog: EdgeCatalog::global(),
            selector,
            config,
        }
    }

    /// Context with the configured request timeout
    pub fn context(&self) -> RequestContext {
        RequestContext::with_timeout(self.config.request_timeout())
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Name of the carbon provider in use
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Dual-grid intensity and recommendation for one delivery
    pub async fn compute_dual_grid(&self, ctx: &RequestContext, req: &DualGridRequest) -> GridResult<DualGridResult> {
        let resolved = self.resolve_content_type(&req.content_type)?;
        let cdn = req.cdn_provider.as_deref().map(|name| self.catalog.provider(name)).transpose()?;
        let edge_ref = cdn.and_then(|p| p.find_edge(&req.edge_location));

        let (user_coord, user_defaulted) = self.resolve_coordinate(req.user_coordinate, &req.user_location, None)?;
        let (edge_coord, edge_defaulted) = self.resolve_coordinate(req.edge_coordinate, &req.edge_location, edge_ref)?;

        let edge_fetch_location = edge_ref.map_or(req.edge_location.as_str(), |e| e.city.as_str());

        let (user_sample, edge_sample) = tokio::join!(
            fetch_sample(self.provider.as_ref(), &req.user_location, ctx.deadline()),
            fetch_sample(self.provider.as_ref(), edge_fetch_location, ctx.deadline()),
        );

        let distance = distance_km(&user_coord, &edge_coord)?;
        let weighted = DualGridCalculator::blend(
            user_sample.carbon_intensity,
            edge_sample.carbon_intensity,
            resolved.content_type,
        );

        let alternatives = match cdn {
            Some(provider) => {
                let max = req
                    .max_alternatives
                    .map_or(self.config.default_max_alternatives, clamp_requested);
                self.selector
                    .alternatives(
                        &user_coord,
                        provider,
                        edge_ref.map(|e| e.id.as_str()),
                        edge_sample.carbon_intensity,
                        max,
                        ctx.deadline(),
                    )
                    .await?
            }
            None => Vec::new(),
        };

        let mut recommendation =
            RecommendationEngine::recommend(&weighted, edge_sample.carbon_intensity, alternatives);

        if recommendation.action == Action::Defer {
            let now = Utc::now();
            let forecast = tokio::time::timeout_at(ctx.deadline(), self.provider.forecast(edge_fetch_location)).await;

            let window = match forecast {
                Ok(Ok(points)) => RecommendationEngine::green_window(&points, edge_sample.carbon_intensity, now),
                Ok(Err(e)) => {
                    warn!(location = %edge_fetch_location, error = %e, "forecast unavailable");
                    None
                }
                Err(_) => {
                    warn!(location = %edge_fetch_location, "forecast timed out");
                    None
                }
            };

            recommendation.time_based_strategy = Some(match window {
                Some(window) => window,
                None => {
                    recommendation.reason.push_str(" (no forecast available, using overnight estimate)");
                    RecommendationEngine::heuristic_window(now)
                }
            });
        }

        let degraded = user_sample.is_fallback() || edge_sample.is_fallback();
        let result = DualGridResult {
            weighted_intensity: weighted.weighted,
            transmission_weight: weighted.transmission_weight,
            computation_weight: weighted.computation_weight,
            distance_km: distance,
            network_hop_estimate: crate::scorer::network_hops(distance),
            content_type: resolved.content_type,
            requested_content_type: req.content_type.clone(),
            content_type_substituted: resolved.substituted,
            coordinates_defaulted: user_defaulted || edge_defaulted,
            recommendation,
            computed_at: Utc::now(),
            degraded,
            user_sample,
            edge_sample,
        };

        info!(
            user = %req.user_location,
            edge = %req.edge_location,
            content_type = %result.content_type,
            weighted = result.weighted_intensity,
            action = ?result.recommendation.action,
            degraded,
            "dual-grid computed"
        );
        Ok(result)
    }

    /// Best edge of `cdn_provider` for a user
    pub async fn optimal_edge(
        &self,
        ctx: &RequestContext,
        user_location: &str,
        user_coordinate: Option<Coordinate>,
        cdn_provider: &str,
        content_type: &str,
    ) -> GridResult<EdgeAlternative> {
        let resolved = self.resolve_content_type(content_type)?;
        let provider = self.catalog.provider(cdn_provider)?;
        let (user_coord, _) = self.resolve_coordinate(user_coordinate, user_location, None)?;

        debug!(user = %user_location, provider = %provider.name, content_type = %resolved.content_type, "optimal edge lookup");
        self.selector.optimal_edge(&user_coord, provider, ctx.deadline()).await
    }

    /// Cleaner edges than `current_edge` (an edge id, or a city/zone name)
    pub async fn alternatives(
        &self,
        ctx: &RequestContext,
        user_location: &str,
        current_edge: &str,
        cdn_provider: &str,
        content_type: &str,
        max_results: Option<i64>,
    ) -> GridResult<Vec<EdgeAlternative>> {
        let resolved = self.resolve_content_type(content_type)?;
        let provider = self.catalog.provider(cdn_provider)?;
        let (user_coord, _) = self.resolve_coordinate(None, user_location, None)?;

        let (current_id, current_location) = Self::current_edge(provider, current_edge)?;
        let current = fetch_sample(self.provider.as_ref(), current_location, ctx.deadline()).await;

        debug!(
            current = %current_edge,
            intensity = current.carbon_intensity,
            content_type = %resolved.content_type,
            "alternatives lookup"
        );

        let max = max_results.map_or(self.config.default_max_alternatives, clamp_requested);
        self.selector
            .alternatives(&user_coord, provider, current_id, current.carbon_intensity, max, ctx.deadline())
            .await
    }

    /// Provider listing
    pub fn list_providers(&self) -> Vec<CdnProviderSummary> {
        self.catalog.summaries()
    }

    fn resolve_content_type(&self, requested: &str) -> GridResult<ResolvedContentType> {
        match requested.parse::<ContentType>() {
            Ok(content_type) => Ok(ResolvedContentType { content_type, substituted: false }),
            Err(e) if self.config.substitute_unknown_content_type => {
                warn!(requested = %requested, "unknown content type, substituting static");
                debug!(error = %e, "content type parse");
                Ok(ResolvedContentType {
                    content_type: ContentType::Static,
                    substituted: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Explicit coordinate, then the matched edge, then the gazetteer,
    /// then the configured default (flagged).
    fn resolve_coordinate(
        &self,
        explicit: Option<Coordinate>,
        location: &str,
        edge: Option<&EdgeLocation>,
    ) -> GridResult<(Coordinate, bool)> {
        if let Some(coordinate) = explicit {
            coordinate.validate()?;
            return Ok((coordinate, false));
        }
        if let Some(edge) = edge {
            return Ok((edge.coordinate, false));
        }
        if let Some(coordinate) = resolve_coordinate(location) {
            return Ok((coordinate, false));
        }

        warn!(location = %location, default = %self.config.default_user_coordinate, "no coordinate for location, using default");
        Ok((self.config.default_user_coordinate, true))
    }

    fn current_edge<'a>(provider: &'a CdnProvider, current_edge: &'a str) -> GridResult<(Option<&'a str>, &'a str)> {
        if let Some(edge) = provider.find_edge(current_edge) {
            return Ok((Some(edge.id.as_str()), edge.city.as_str()));
        }
        resolve_zone(current_edge)?;
        Ok((None, current_edge))
    }
}

impl std::fmt::Debug for DualGridService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DualGridService")
            .field("provider", &self.provider.name())
            .field("selector", &self.selector)
            .field("config", &self.config)
            .finish()
    }
}
