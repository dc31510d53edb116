//! CDN edge-location registry
//!
//! Immutable, process-wide table of CDN providers and their edge
//! locations, compiled into the binary and built once on first use.
//! There is no mutation API: lookups are safe from any number of
//! concurrent requests.

#![warn(missing_docs)]

pub mod catalog;
pub mod edges;
pub mod locations;

pub use catalog::EdgeCatalog;
pub use locations::{find_city, resolve_coordinate, resolve_zone, KnownCity};

use greengrid_common::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Edge tier (1 = primary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum EdgeTier {
    /// Primary PoP, full capacity
    Primary = 1,
    /// Regional PoP
    Regional = 2,
    /// Local/satellite PoP
    Local = 3,
}

impl EdgeTier {
    /// Numeric rank
    pub const fn rank(&self) -> u8 {
        *self as u8
    }
}

impl From<EdgeTier> for u8 {
    fn from(tier: EdgeTier) -> Self {
        tier.rank()
    }
}

impl TryFrom<u8> for EdgeTier {
    type Error = InvalidTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Primary),
            2 => Ok(Self::Regional),
            3 => Ok(Self::Local),
            other => Err(InvalidTier(other)),
        }
    }
}

/// Tier outside 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTier(pub u8);

impl fmt::Display for InvalidTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge tier must be 1, 2 or 3 (got {})", self.0)
    }
}

impl std::error::Error for InvalidTier {}

/// Coarse capacity of an edge location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityClass {
    /// Satellite cache
    Small,
    /// Regional PoP
    Medium,
    /// Metro hub
    Large,
    /// Global core hub
    Xlarge,
}

/// How a provider routes requests by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeSelectionStrategy {
    /// BGP anycast, nearest network hop
    Anycast,
    /// DNS-based geo steering
    Geo,
    /// Lowest measured latency
    Latency,
    /// Carbon-aware routing
    CarbonAware,
}

/// CDN point of presence. Static reference data, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeLocation {
    /// Unique id within the provider
    pub id: String,
    /// City name
    pub city: String,
    /// ISO 3166 alpha-2 country code
    pub country: String,
    /// Grid zone the edge draws power from
    pub grid_zone_id: String,
    /// Position
    pub coordinate: Coordinate,
    /// Tier (1 = primary)
    pub tier: EdgeTier,
    /// Capacity class
    pub capacity_class: CapacityClass,
    /// Provider has a renewable-energy commitment for this site
    pub renewable_commitment: bool,
}

/// CDN provider with its edges
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdnProvider {
    /// Registry key (lowercase)
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Default routing strategy
    pub default_edge_selection_strategy: EdgeSelectionStrategy,
    /// Whether the provider can steer by carbon intensity
    pub carbon_aware_routing_supported: bool,
    /// Edges keyed by id
    pub edges: HashMap<String, EdgeLocation>,
}

impl CdnProvider {
    /// Edges ordered by id
    pub fn edges(&self) -> Vec<&EdgeLocation> {
        let mut edges: Vec<_> = self.edges.values().collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        edges
    }

    /// Edge by exact id
    pub fn edge(&self, id: &str) -> Option<&EdgeLocation> {
        self.edges.get(id)
    }

    /// Edge by id or city name (case-insensitive).
    ///
    /// When several edges share a city, the lowest tier wins, then the
    /// smallest id.
    pub fn find_edge(&self, location: &str) -> Option<&EdgeLocation> {
        let location = location.trim();
        if let Some(edge) = self.edges.get(location) {
            return Some(edge);
        }
        self.edges
            .values()
            .filter(|e| e.id.eq_ignore_ascii_case(location) || e.city.eq_ignore_ascii_case(location))
            .min_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.id.cmp(&b.id)))
    }

    /// Summary for listings
    pub fn summary(&self) -> CdnProviderSummary {
        CdnProviderSummary {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            edge_count: self.edges.len(),
            carbon_aware_routing_supported: self.carbon_aware_routing_supported,
            default_edge_selection_strategy: self.default_edge_selection_strategy,
        }
    }
}

/// Provider listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdnProviderSummary {
    /// Registry key
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Number of edges
    pub edge_count: usize,
    /// Whether the provider can steer by carbon intensity
    pub carbon_aware_routing_supported: bool,
    /// Default routing strategy
    pub default_edge_selection_strategy: EdgeSelectionStrategy,
}
