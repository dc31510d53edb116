//! Dual-Grid Carbon Engine
//!
//! Estimates the carbon cost of delivering content when the user and the
//! serving edge sit in different electricity grids, and recommends the
//! lowest-carbon delivery path.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        DualGridService                          │
//! │                                                                 │
//! │   user sample ──┐                          ┌── EdgeCatalog      │
//! │                 ├─► DualGridCalculator     │                    │
//! │   edge sample ──┘          │               ▼                    │
//! │        ▲                   │         EdgeSelector ─► EdgeScorer │
//! │        │                   ▼               │                    │
//! │  CarbonIntensityProvider  RecommendationEngine ◄───────┘        │
//! │  (fan-out / fan-in)                                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod orchestrator;
pub mod recommend;
pub mod scorer;
pub mod selector;
pub mod weights;

pub use config::EngineConfig;
pub use orchestrator::{DualGridRequest, DualGridService, RequestContext};
pub use recommend::RecommendationEngine;
pub use scorer::EdgeScorer;
pub use selector::EdgeSelector;
pub use weights::{DualGridCalculator, WeightProfile, WeightedIntensity};

use chrono::{DateTime, Utc};
use greengrid_catalog::EdgeLocation;
use greengrid_common::{CarbonSample, ContentType};
use serde::{Deserialize, Serialize};

/// Candidate edge that could serve the user instead of the current one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeAlternative {
    /// Edge location
    pub location: EdgeLocation,
    /// CDN provider name
    pub provider: String,
    /// Grid intensity at the edge, gCO2/kWh
    pub carbon_intensity: f64,
    /// Distance from the user, km
    pub distance_km: f64,
    /// Estimated round-trip latency, ms
    pub estimated_latency_ms: f64,
    /// Availability score, 0-100
    pub availability_score: f64,
    /// Intensity came from a fallback estimate
    #[serde(default, skip_serializing_if = "is_false")]
    pub degraded: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// What to do with a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Carbon is low on both sides
    Proceed,
    /// Carbon is moderate; apply content-specific optimizations
    Optimize,
    /// Carbon is high and nothing better is reachable; wait for a green window
    Defer,
    /// Carbon is high and a cleaner edge exists
    Relocate,
}

/// Next low-carbon window for deferred delivery
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBasedStrategy {
    /// Window start
    pub next_optimal_window_start: DateTime<Utc>,
    /// Window end
    pub next_optimal_window_end: DateTime<Utc>,
    /// Confidence, 0-1
    pub confidence: f64,
}

/// Delivery recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Action
    pub action: Action,
    /// Human-readable reason
    pub reason: String,
    /// Content-specific tips
    pub optimization_tips: Vec<String>,
    /// Cleaner edges, best first
    pub alternatives: Vec<EdgeAlternative>,
    /// gCO2 saved per hour of delivery by moving to the best alternative
    #[serde(rename = "estimatedSavingsGramsCO2")]
    pub estimated_savings_grams_co2: Option<f64>,
    /// Green window, attached when deferring
    pub time_based_strategy: Option<TimeBasedStrategy>,
}

/// Composed dual-grid result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualGridResult {
    /// User-side sample
    pub user_sample: CarbonSample,
    /// Edge-side sample
    pub edge_sample: CarbonSample,
    /// Blended intensity, gCO2/kWh
    pub weighted_intensity: f64,
    /// Transmission weight used
    pub transmission_weight: f64,
    /// Computation weight used
    pub computation_weight: f64,
    /// User ↔ edge distance, km
    pub distance_km: f64,
    /// Estimated network hops
    pub network_hop_estimate: u32,
    /// Content type the weights were taken from
    pub content_type: ContentType,
    /// Content type as requested
    pub requested_content_type: String,
    /// Unknown content type replaced by `static`
    pub content_type_substituted: bool,
    /// A coordinate fell back to the documented default
    pub coordinates_defaulted: bool,
    /// Recommendation
    pub recommendation: Recommendation,
    /// Computation time
    pub computed_at: DateTime<Utc>,
    /// At least one sample is a fallback estimate
    pub degraded: bool,
}
