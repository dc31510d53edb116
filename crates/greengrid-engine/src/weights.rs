//! Dual-grid weighting
//!
//! Transmission energy is drawn from the user's grid, computation
//! energy from the edge's grid. How much of each a delivery consumes
//! depends on the content type.

use greengrid_common::{ContentType, GridResult};
use serde::{Deserialize, Serialize};

/// Share of delivery energy per side. Weights sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightProfile {
    /// Weight of the user-side (transmission) grid
    pub transmission: f64,
    /// Weight of the edge-side (computation) grid
    pub computation: f64,
}

impl WeightProfile {
    /// Static assets: transfer dominated
    pub const STATIC: Self = Self { transmission: 0.80, computation: 0.20 };

    /// Video streaming
    pub const VIDEO: Self = Self { transmission: 0.60, computation: 0.40 };

    /// API responses
    pub const API: Self = Self { transmission: 0.40, computation: 0.60 };

    /// Server-rendered pages
    pub const DYNAMIC: Self = Self { transmission: 0.30, computation: 0.70 };

    /// Database-backed queries
    pub const DATABASE: Self = Self { transmission: 0.25, computation: 0.75 };

    /// Model inference: compute dominated
    pub const AI: Self = Self { transmission: 0.20, computation: 0.80 };

    /// Get weights for content type
    pub const fn for_content(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Static => Self::STATIC,
            ContentType::Video => Self::VIDEO,
            ContentType::Api => Self::API,
            ContentType::Dynamic => Self::DYNAMIC,
            ContentType::Database => Self::DATABASE,
            ContentType::Ai => Self::AI,
        }
    }
}

/// Output of the dual-grid blend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedIntensity {
    /// Content type the profile was taken from
    pub content_type: ContentType,
    /// Blended intensity in gCO2/kWh
    pub weighted: f64,
    /// Transmission weight used
    pub transmission_weight: f64,
    /// Computation weight used
    pub computation_weight: f64,
}

/// Combines user-side and edge-side intensity into one figure
#[derive(Debug, Clone, Copy, Default)]
pub struct DualGridCalculator;

impl DualGridCalculator {
    /// Blend for a content-type key. Unregistered keys fail with
    /// `UnknownContentType`; there is no silent default here.
    pub fn compute_weighted(
        user_intensity: f64,
        edge_intensity: f64,
        content_type: &str,
    ) -> GridResult<WeightedIntensity> {
        let content_type = content_type.parse::<ContentType>()?;
        Ok(Self::blend(user_intensity, edge_intensity, content_type))
    }

    /// `user * tw + edge * cw`
    #[inline]
    pub fn blend(user_intensity: f64, edge_intensity: f64, content_type: ContentType) -> WeightedIntensity {
        let w = WeightProfile::for_content(content_type);
        WeightedIntensity {
            content_type,
            weighted: user_intensity * w.transmission + edge_intensity * w.computation,
            transmission_weight: w.transmission,
            computation_weight: w.computation,
        }
    }
}
