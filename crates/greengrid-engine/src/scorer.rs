//! Edge scoring and ranking
//!
//! Pure functions over a complete candidate set. Nothing here depends on
//! the order in which per-edge intensities arrived.

use crate::EdgeAlternative;
use greengrid_catalog::EdgeLocation;
use greengrid_common::{GridError, GridResult};
use std::cmp::Ordering;

/// Weight of carbon intensity in the score
pub const CARBON_WEIGHT: f64 = 0.7;
/// Weight of the distance factor in the score
pub const DISTANCE_WEIGHT: f64 = 0.3;
/// km per distance-factor unit, keeps distance from dominating carbon
pub const DISTANCE_SCALE_KM: f64 = 1000.0;
/// Score penalty per tier below primary
pub const TIER_PENALTY: f64 = 0.05;
/// Score multiplier for edges with a renewable commitment
pub const RENEWABLE_BONUS: f64 = 0.90;
/// An alternative must be below this fraction of the current intensity
pub const IMPROVEMENT_THRESHOLD: f64 = 0.8;
/// Bounds for requested alternative counts
pub const MIN_ALTERNATIVES: usize = 1;
/// Upper bound for requested alternative counts
pub const MAX_ALTERNATIVES: usize = 20;

/// Edge with its looked-up intensity and distance from the user
#[derive(Debug, Clone, Copy)]
pub struct EdgeCandidate<'a> {
    /// Edge
    pub edge: &'a EdgeLocation,
    /// Grid intensity at the edge
    pub carbon_intensity: f64,
    /// Distance from the user, km
    pub distance_km: f64,
    /// Intensity came from a fallback estimate
    pub degraded: bool,
}

impl EdgeCandidate<'_> {
    /// Convert to the wire type
    pub fn to_alternative(&self, provider: &str) -> EdgeAlternative {
        EdgeAlternative {
            location: self.edge.clone(),
            provider: provider.to_string(),
            carbon_intensity: self.carbon_intensity,
            distance_km: self.distance_km,
            estimated_latency_ms: estimated_latency_ms(self.distance_km),
            availability_score: availability_score(self.edge),
            degraded: self.degraded,
        }
    }
}

/// Edge scorer (lower is better)
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeScorer;

impl EdgeScorer {
    /// `(carbon*0.7 + km/1000*0.3) * (1 + 0.05*(tier-1)) * (0.9 if renewable)`
    #[inline]
    pub fn score(candidate: &EdgeCandidate<'_>) -> f64 {
        let distance_factor = candidate.distance_km / DISTANCE_SCALE_KM;
        let mut score = candidate.carbon_intensity * CARBON_WEIGHT + distance_factor * DISTANCE_WEIGHT;

        score *= 1.0 + TIER_PENALTY * f64::from(candidate.edge.tier.rank() - 1);

        if candidate.edge.renewable_commitment {
            score *= RENEWABLE_BONUS;
        }

        score
    }

    /// Score and rank, best first. Ties: lower tier, then shorter
    /// distance, then smaller id.
    pub fn rank<'a>(candidates: &[EdgeCandidate<'a>]) -> Vec<(EdgeCandidate<'a>, f64)> {
        let mut scored: Vec<_> = candidates.iter().map(|c| (*c, Self::score(c))).collect();

        scored.sort_by(|(a, sa), (b, sb)| {
            sa.total_cmp(sb).then_with(|| Self::tie_break(a, b))
        });
        scored
    }

    /// Minimum-score edge, or `NoSuitableEdge` for an empty set
    pub fn optimal<'a>(candidates: &[EdgeCandidate<'a>]) -> GridResult<EdgeCandidate<'a>> {
        Self::rank(candidates)
            .into_iter()
            .next()
            .map(|(c, _)| c)
            .ok_or_else(|| GridError::NoSuitableEdge("candidate set is empty".into()))
    }

    /// Edges that beat the current one by the fixed 20% margin, cleanest
    /// first, at most `clamp_max_results(max_results)` of them.
    pub fn alternatives<'a>(
        candidates: &[EdgeCandidate<'a>],
        current_edge_id: Option<&str>,
        current_intensity: f64,
        max_results: usize,
    ) -> Vec<EdgeCandidate<'a>> {
        let limit = current_intensity * IMPROVEMENT_THRESHOLD;

        let mut kept: Vec<_> = candidates
            .iter()
            .filter(|c| Some(c.edge.id.as_str()) != current_edge_id)
            .filter(|c| c.carbon_intensity < limit)
            .copied()
            .collect();

        kept.sort_by(|a, b| {
            a.carbon_intensity
                .total_cmp(&b.carbon_intensity)
                .then_with(|| a.distance_km.total_cmp(&b.distance_km))
                .then_with(|| a.edge.id.cmp(&b.edge.id))
        });
        kept.truncate(clamp_max_results(max_results));
        kept
    }

    fn tie_break(a: &EdgeCandidate<'_>, b: &EdgeCandidate<'_>) -> Ordering {
        a.edge
            .tier
            .cmp(&b.edge.tier)
            .then_with(|| a.distance_km.total_cmp(&b.distance_km))
            .then_with(|| a.edge.id.cmp(&b.edge.id))
    }
}

/// Clamp a requested alternative count into [1, 20]
pub fn clamp_max_results(requested: usize) -> usize {
    requested.clamp(MIN_ALTERNATIVES, MAX_ALTERNATIVES)
}

/// Clamp a count taken off the wire. Negative counts become 1.
pub fn clamp_requested(requested: i64) -> usize {
    usize::try_from(requested).map_or(MIN_ALTERNATIVES, clamp_max_results)
}

/// `distance/20 + 10` ms
pub fn estimated_latency_ms(distance_km: f64) -> f64 {
    distance_km / 20.0 + 10.0
}

/// `100 - tier*5`
pub fn availability_score(edge: &EdgeLocation) -> f64 {
    100.0 - f64::from(edge.tier.rank()) * 5.0
}

/// `clamp(3 + floor(distance/150), 3, 30)`
pub fn network_hops(distance_km: f64) -> u32 {
    let hops = 3.0 + (distance_km.max(0.0) / 150.0).floor();
    hops.clamp(3.0, 30.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use greengrid_catalog::{CapacityClass, EdgeTier};
    use greengrid_common::Coordinate;

    fn edge(id: &str, tier: EdgeTier, renewable: bool) -> EdgeLocation {
        EdgeLocation {
            id: id.to_string(),
            city: id.to_string(),
            country: "DE".into(),
            grid_zone_id: "DE".into(),
            coordinate: Coordinate { latitude: 50.0, longitude: 8.0 },
            tier,
            capacity_class: CapacityClass::Medium,
            renewable_commitment: renewable,
        }
    }

    fn cand(edge: &EdgeLocation, intensity: f64, km: f64) -> EdgeCandidate<'_> {
        EdgeCandidate { edge, carbon_intensity: intensity, distance_km: km, degraded: false }
    }

    #[test]
    fn test_score_formula() {
        let e = edge("a", EdgeTier::Local, true);
        let c = cand(&e, 100.0, 500.0);
        let expected = (100.0 * 0.7 + 0.5 * 0.3) * 1.10 * 0.90;
        assert!((EdgeScorer::score(&c) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_optimal_prefers_low_carbon() {
        let dirty = edge("dirty", EdgeTier::Primary, false);
        let clean = edge("clean", EdgeTier::Local, false);
        let cands = [cand(&dirty, 400.0, 10.0), cand(&clean, 50.0, 2000.0)];
        assert_eq!(EdgeScorer::optimal(&cands).unwrap().edge.id, "clean");
    }

    #[test]
    fn test_tie_breaks() {
        let a = edge("b-edge", EdgeTier::Primary, false);
        let b = edge("a-edge", EdgeTier::Primary, false);
        let same = [cand(&a, 100.0, 100.0), cand(&b, 100.0, 100.0)];
        assert_eq!(EdgeScorer::optimal(&same).unwrap().edge.id, "a-edge");

        let near = edge("z-near", EdgeTier::Primary, false);
        let far = edge("a-far", EdgeTier::Primary, false);
        // equal score only if distance factor equal, so compare via tie_break directly
        let ord = EdgeScorer::tie_break(&cand(&near, 1.0, 10.0), &cand(&far, 1.0, 20.0));
        assert_eq!(ord, Ordering::Less);

        // lower tier wins before distance and id are consulted
        let primary = edge("z-primary", EdgeTier::Primary, false);
        let local = edge("a-local", EdgeTier::Local, false);
        let ord = EdgeScorer::tie_break(&cand(&primary, 1.0, 10.0), &cand(&local, 1.0, 10.0));
        assert_eq!(ord, Ordering::Less);
        let ord = EdgeScorer::tie_break(&cand(&local, 1.0, 5.0), &cand(&primary, 1.0, 500.0));
        assert_eq!(ord, Ordering::Greater);
    }

    #[test]
    fn test_order_independent() {
        let edges: Vec<_> = (0..6)
            .map(|i| edge(&format!("e{i}"), EdgeTier::Regional, i % 2 == 0))
            .collect();
        let mut cands: Vec<_> = edges
            .iter()
            .enumerate()
            .map(|(i, e)| cand(e, 100.0 + (i % 3) as f64, 300.0))
            .collect();

        let forward: Vec<_> = EdgeScorer::rank(&cands).into_iter().map(|(c, _)| c.edge.id.clone()).collect();
        cands.reverse();
        let backward: Vec<_> = EdgeScorer::rank(&cands).into_iter().map(|(c, _)| c.edge.id.clone()).collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_empty_is_no_suitable_edge() {
        assert!(matches!(EdgeScorer::optimal(&[]), Err(GridError::NoSuitableEdge(_))));
    }

    #[test]
    fn test_alternatives_threshold_and_order() {
        let cur = edge("current", EdgeTier::Primary, false);
        let e1 = edge("e1", EdgeTier::Primary, false);
        let e2 = edge("e2", EdgeTier::Primary, false);
        let e3 = edge("e3", EdgeTier::Primary, false);
        let e4 = edge("e4", EdgeTier::Primary, false);
        let cands = [
            cand(&cur, 10.0, 0.0),   // excluded even though clean
            cand(&e1, 80.0, 100.0),  // exactly 0.8 * current: excluded
            cand(&e2, 30.0, 100.0),
            cand(&e3, 79.9, 100.0),
            cand(&e4, 30.0, 50.0),
        ];

        let alts = EdgeScorer::alternatives(&cands, Some("current"), 100.0, 10);
        let ids: Vec<_> = alts.iter().map(|c| c.edge.id.as_str()).collect();
        assert_eq!(ids, vec!["e4", "e2", "e3"]);
        assert!(alts.iter().all(|c| c.carbon_intensity < 100.0 * IMPROVEMENT_THRESHOLD));
    }

    #[test]
    fn test_max_results_clamped() {
        let edges: Vec<_> = (0..30).map(|i| edge(&format!("e{i:02}"), EdgeTier::Primary, false)).collect();
        let cands: Vec<_> = edges.iter().enumerate().map(|(i, e)| cand(e, i as f64, 0.0)).collect();

        assert_eq!(EdgeScorer::alternatives(&cands, None, 1000.0, 0).len(), 1);
        assert_eq!(EdgeScorer::alternatives(&cands, None, 1000.0, 5).len(), 5);
        assert_eq!(EdgeScorer::alternatives(&cands, None, 1000.0, 500).len(), 20);

        assert_eq!(clamp_requested(-3), 1);
        assert_eq!(clamp_requested(0), 1);
        assert_eq!(clamp_requested(7), 7);
        assert_eq!(clamp_requested(i64::MAX), 20);

        let alts = EdgeScorer::alternatives(&cands, None, 1000.0, 20);
        assert!(alts.windows(2).all(|w| w[0].carbon_intensity <= w[1].carbon_intensity));
    }

    #[test]
    fn test_derived_metrics() {
        assert_eq!(estimated_latency_ms(400.0), 30.0);
        assert_eq!(availability_score(&edge("a", EdgeTier::Regional, false)), 90.0);
        assert_eq!(network_hops(0.0), 3);
        assert_eq!(network_hops(449.0), 5);
        assert_eq!(network_hops(20_000.0), 30);
    }
}
