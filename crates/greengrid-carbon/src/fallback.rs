//! Synthetic estimates for failed fetches
//!
//! Every estimate carries `DataSource::Fallback` so it can never be
//! mistaken for measured data.

use crate::baseline::baseline;
use greengrid_catalog::resolve_zone;
use greengrid_common::{CarbonSample, DataSource};

/// World average grid intensity, gCO2/kWh
pub const GLOBAL_AVERAGE_INTENSITY: f64 = 475.0;

/// World average renewable share, percent
pub const GLOBAL_AVERAGE_RENEWABLE: f64 = 30.0;

/// Estimate for a city name or zone id from the baseline table, or the
/// world average when the location is unknown.
pub fn estimate(location: &str) -> CarbonSample {
    let (intensity, renewable) = resolve_zone(location)
        .ok()
        .and_then(baseline)
        .map(|b| (b.intensity, b.renewable))
        .unwrap_or((GLOBAL_AVERAGE_INTENSITY, GLOBAL_AVERAGE_RENEWABLE));

    CarbonSample::new(location, intensity, renewable, DataSource::Fallback)
}
