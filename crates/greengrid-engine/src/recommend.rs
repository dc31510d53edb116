//! Recommendation engine
//!
//! Stateless classification of a weighted intensity into an action, with
//! content-specific tips, a savings estimate and, for deferred delivery,
//! a green window taken from the provider's forecast.

use crate::weights::WeightedIntensity;
use crate::{Action, EdgeAlternative, Recommendation, TimeBasedStrategy};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use greengrid_carbon::ForecastPoint;
use greengrid_common::ContentType;

/// Below this weighted intensity delivery proceeds as-is
pub const PROCEED_BELOW: f64 = 150.0;

/// At or above this weighted intensity delivery is relocated or deferred
pub const HIGH_CARBON_FROM: f64 = 300.0;

/// Forecast points within this factor of the minimum join the window
pub const WINDOW_TOLERANCE: f64 = 1.10;

/// Confidence bounds for forecast windows
pub const MIN_CONFIDENCE: f64 = 0.1;
/// Upper confidence bound
pub const MAX_CONFIDENCE: f64 = 0.95;

/// Confidence of the overnight window used without a forecast
pub const HEURISTIC_CONFIDENCE: f64 = 0.3;
const HEURISTIC_START_HOUR: u32 = 1;
const HEURISTIC_HOURS: i64 = 4;

/// Energy drawn per hour of delivery, kWh
pub const fn energy_kwh_per_hour(content_type: ContentType) -> f64 {
    match content_type {
        ContentType::Static => 0.05,
        ContentType::Api => 0.10,
        ContentType::Dynamic => 0.15,
        ContentType::Database => 0.30,
        ContentType::Video => 0.50,
        ContentType::Ai => 1.20,
    }
}

/// Maps weighted results to delivery recommendations
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Threshold table. Relocation beats deferral whenever a cleaner edge
    /// exists.
    pub fn classify(weighted_intensity: f64, has_alternatives: bool) -> Action {
        if weighted_intensity < PROCEED_BELOW {
            Action::Proceed
        } else if weighted_intensity < HIGH_CARBON_FROM {
            Action::Optimize
        } else if has_alternatives {
            Action::Relocate
        } else {
            Action::Defer
        }
    }

    /// Build a recommendation. `alternatives` must already be sorted,
    /// cleanest first. The time-based strategy is left empty; the caller
    /// attaches it for deferred delivery.
    pub fn recommend(
        weighted: &WeightedIntensity,
        current_edge_intensity: f64,
        alternatives: Vec<EdgeAlternative>,
    ) -> Recommendation {
        let content_type = weighted.content_type;
        let action = Self::classify(weighted.weighted, !alternatives.is_empty());

        let reason = match action {
            Action::Proceed => "both locations have low carbon intensity".to_string(),
            Action::Optimize => format!(
                "moderate carbon intensity ({:.0} gCO2/kWh), apply {} delivery optimizations",
                weighted.weighted, content_type
            ),
            Action::Relocate => {
                let best = &alternatives[0];
                format!(
                    "high carbon intensity ({:.0} gCO2/kWh), {} at {:.0} gCO2/kWh is cleaner",
                    weighted.weighted, best.location.id, best.carbon_intensity
                )
            }
            Action::Defer => format!(
                "high carbon intensity ({:.0} gCO2/kWh) and no cleaner edge, defer to a low-carbon window",
                weighted.weighted
            ),
        };

        let optimization_tips = match action {
            Action::Proceed => Vec::new(),
            Action::Optimize => Self::tips(content_type),
            Action::Relocate => {
                let best = &alternatives[0];
                let mut tips = vec![format!("route traffic to {} ({})", best.location.id, best.location.city)];
                tips.extend(Self::tips(content_type));
                tips
            }
            Action::Defer => {
                let mut tips = vec!["schedule non-urgent delivery inside the green window".to_string()];
                tips.extend(Self::tips(content_type));
                tips
            }
        };

        let estimated_savings_grams_co2 =
            Self::estimated_savings(content_type, current_edge_intensity, &alternatives);

        Recommendation {
            action,
            reason,
            optimization_tips,
            alternatives,
            estimated_savings_grams_co2,
            time_based_strategy: None,
        }
    }

    /// Content-specific optimization tips
    pub fn tips(content_type: ContentType) -> Vec<String> {
        let tips: &[&str] = match content_type {
            ContentType::Video => &[
                "use adaptive bitrate streaming to cap resolution",
                "encode with AV1 to cut transfer size",
            ],
            ContentType::Api => &[
                "enable response caching at the edge",
                "batch requests to reduce round trips",
            ],
            ContentType::Static => &[
                "serve with long-TTL cache headers",
                "pre-compress assets with Brotli",
            ],
            ContentType::Ai => &[
                "serve cached inference results for repeated prompts",
                "use quantized models for inference",
            ],
            ContentType::Database => &[
                "route reads to replicas in low-carbon regions",
                "cache hot query results at the edge",
            ],
            ContentType::Dynamic => &[
                "cache rendered fragments at the edge",
                "move personalization to the client",
            ],
        };
        tips.iter().map(|t| t.to_string()).collect()
    }

    /// gCO2 saved per hour by moving to the best alternative
    pub fn estimated_savings(
        content_type: ContentType,
        current_edge_intensity: f64,
        alternatives: &[EdgeAlternative],
    ) -> Option<f64> {
        let best = alternatives.first()?;
        let delta = (current_edge_intensity - best.carbon_intensity).max(0.0);
        Some(delta * energy_kwh_per_hour(content_type))
    }

    /// Lowest contiguous forecast window after `now`.
    ///
    /// Starts at the forecast minimum and extends while points stay within
    /// 10% of it. `None` when no point lies in the future.
    pub fn green_window(
        points: &[ForecastPoint],
        current_intensity: f64,
        now: DateTime<Utc>,
    ) -> Option<TimeBasedStrategy> {
        let mut future: Vec<_> = points.iter().filter(|p| p.datetime > now).copied().collect();
        future.sort_by_key(|p| p.datetime);

        let (start_idx, min) = future
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, p)| match best {
                Some((_, m)) if m <= p.carbon_intensity => best,
                _ => Some((i, p.carbon_intensity)),
            })?;

        let limit = min * WINDOW_TOLERANCE;
        let window: Vec<_> = future[start_idx..]
            .iter()
            .take_while(|p| p.carbon_intensity <= limit)
            .collect();

        let first = window.first()?;
        let last = window.last()?;
        let mean = window.iter().map(|p| p.carbon_intensity).sum::<f64>() / window.len() as f64;

        let confidence = if current_intensity > 0.0 {
            (1.0 - mean / current_intensity).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
        } else {
            MIN_CONFIDENCE
        };

        Some(TimeBasedStrategy {
            next_optimal_window_start: first.datetime,
            next_optimal_window_end: last.datetime + Duration::hours(1),
            confidence,
        })
    }

    /// Next 01:00-05:00 UTC window, used when no forecast is available
    pub fn heuristic_window(now: DateTime<Utc>) -> TimeBasedStrategy {
        let at = NaiveTime::from_hms_opt(HEURISTIC_START_HOUR, 0, 0).unwrap_or_default();
        let mut start = Utc.from_utc_datetime(&now.date_naive().and_time(at));
        if start <= now {
            start += Duration::days(1);
        }

        TimeBasedStrategy {
            next_optimal_window_start: start,
            next_optimal_window_end: start + Duration::hours(HEURISTIC_HOURS),
            confidence: HEURISTIC_CONFIDENCE,
        }
    }
}
