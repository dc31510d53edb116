//! Read-only provider registry

use crate::edges::{ProviderSeed, PROVIDERS};
use crate::locations::find_city;
use crate::{CdnProvider, CdnProviderSummary, EdgeLocation};
use greengrid_common::{GridError, GridResult};
use std::collections::HashMap;
use std::sync::OnceLock;

static GLOBAL: OnceLock<EdgeCatalog> = OnceLock::new();

/// Registry of CDN providers keyed by lowercase name
#[derive(Debug, Clone)]
pub struct EdgeCatalog {
    providers: HashMap<String, CdnProvider>,
}

impl EdgeCatalog {
    /// Process-wide catalog built from the compiled tables on first use
    pub fn global() -> &'static EdgeCatalog {
        GLOBAL.get_or_init(Self::builtin)
    }

    /// Build from the compiled tables
    pub fn builtin() -> Self {
        Self::from_seeds(PROVIDERS)
    }

    /// Build from provider rows. Edges whose city is missing from the
    /// gazetteer are skipped with a warning.
    pub fn from_seeds(seeds: &[ProviderSeed]) -> Self {
        let mut providers = HashMap::with_capacity(seeds.len());

        for seed in seeds {
            let mut edges = HashMap::with_capacity(seed.edges.len());

            for e in seed.edges {
                let Some(city) = find_city(e.city) else {
                    tracing::warn!(provider = seed.name, edge = e.id, city = e.city, "edge city not in gazetteer, skipping");
                    continue;
                };

                edges.insert(e.id.to_string(), EdgeLocation {
                    id: e.id.to_string(),
                    city: city.name.to_string(),
                    country: city.country.to_string(),
                    grid_zone_id: city.zone.to_string(),
                    coordinate: city.coordinate(),
                    tier: e.tier,
                    capacity_class: e.capacity,
                    renewable_commitment: e.renewable,
                });
            }

            providers.insert(seed.name.to_ascii_lowercase(), CdnProvider {
                name: seed.name.to_ascii_lowercase(),
                display_name: seed.display_name.to_string(),
                default_edge_selection_strategy: seed.strategy,
                carbon_aware_routing_supported: seed.carbon_aware,
                edges,
            });
        }

        Self { providers }
    }

    /// Provider by name (case-insensitive)
    pub fn get_provider(&self, name: &str) -> Option<&CdnProvider> {
        self.providers.get(&name.trim().to_ascii_lowercase())
    }

    /// Provider by name, or `UnknownCdnProvider`
    pub fn provider(&self, name: &str) -> GridResult<&CdnProvider> {
        self.get_provider(name)
            .ok_or_else(|| GridError::UnknownCdnProvider(name.to_string()))
    }

    /// Edges of a provider ordered by id
    pub fn list_edges(&self, provider: &str) -> GridResult<Vec<&EdgeLocation>> {
        Ok(self.provider(provider)?.edges())
    }

    /// Provider summaries ordered by name
    pub fn summaries(&self) -> Vec<CdnProviderSummary> {
        let mut list: Vec<_> = self.providers.values().map(CdnProvider::summary).collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    /// Number of providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for EdgeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::EdgeSeed;
    use crate::{CapacityClass, EdgeSelectionStrategy, EdgeTier};

    #[test]
    fn test_builtin_resolves_every_edge() {
        let catalog = EdgeCatalog::builtin();
        for seed in PROVIDERS {
            let provider = catalog.get_provider(seed.name).unwrap();
            assert_eq!(provider.edges.len(), seed.edges.len(), "{} lost edges", seed.name);
            for edge in provider.edges() {
                assert!(edge.coordinate.is_valid());
                assert!(!edge.grid_zone_id.is_empty());
            }
        }
    }

    #[test]
    fn test_provider_lookup() {
        let catalog = EdgeCatalog::global();
        assert!(catalog.get_provider("Cloudflare").is_some());
        assert!(catalog.get_provider("acme-cdn").is_none());
        assert_eq!(
            catalog.list_edges("acme-cdn").unwrap_err(),
            GridError::UnknownCdnProvider("acme-cdn".into())
        );
    }

    #[test]
    fn test_list_edges_sorted() {
        let catalog = EdgeCatalog::global();
        let edges = catalog.list_edges("akamai").unwrap();
        let ids: Vec<_> = edges.iter().map(|e| e.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_find_edge_by_city() {
        let catalog = EdgeCatalog::global();
        let cf = catalog.get_provider("cloudflare").unwrap();
        assert_eq!(cf.find_edge("frankfurt").unwrap().id, "cf-fra");
        assert_eq!(cf.find_edge("cf-arn").unwrap().city, "Stockholm");
        assert!(cf.find_edge("Chicago").is_none());
    }

    #[test]
    fn test_summaries() {
        let summaries = EdgeCatalog::global().summaries();
        let names: Vec<_> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["akamai", "cloudflare", "cloudfront", "fastly"]);
        assert!(summaries.iter().all(|s| s.edge_count > 0));
    }

    #[test]
    fn test_unknown_city_skipped() {
        const EDGES: &[EdgeSeed] = &[
            EdgeSeed { id: "x-ber", city: "Berlin", tier: EdgeTier::Primary, capacity: CapacityClass::Large, renewable: true },
            EdgeSeed { id: "x-atl", city: "Atlantis", tier: EdgeTier::Local, capacity: CapacityClass::Small, renewable: false },
        ];
        let seeds = [ProviderSeed {
            name: "Test",
            display_name: "Test CDN",
            strategy: EdgeSelectionStrategy::Geo,
            carbon_aware: false,
            edges: EDGES,
        }];
        let catalog = EdgeCatalog::from_seeds(&seeds);
        let provider = catalog.get_provider("test").unwrap();
        assert_eq!(provider.edges.len(), 1);
        assert!(provider.edge("x-ber").is_some());
    }
}
