//! Zone baselines
//!
//! Typical annual-average intensity and renewable share per grid zone.
//! Feeds the static provider and the fallback estimator.

/// Baseline figures for one zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneBaseline {
    /// Zone id
    pub zone: &'static str,
    /// gCO2/kWh
    pub intensity: f64,
    /// Percent
    pub renewable: f64,
}

const fn zone(zone: &'static str, intensity: f64, renewable: f64) -> ZoneBaseline {
    ZoneBaseline { zone, intensity, renewable }
}

/// Every zone with a known baseline
pub static BASELINES: &[ZoneBaseline] = &[
    zone("AE", 420.0, 8.0),
    zone("AT", 120.0, 78.0),
    zone("AU-NSW", 620.0, 30.0),
    zone("AU-VIC", 700.0, 35.0),
    zone("BE", 150.0, 30.0),
    zone("BR-CS", 100.0, 85.0),
    zone("CA-ON", 40.0, 35.0),
    zone("CA-QC", 5.0, 99.0),
    zone("CH", 40.0, 70.0),
    zone("CZ", 450.0, 18.0),
    zone("DE", 380.0, 52.0),
    zone("DK-DK2", 140.0, 70.0),
    zone("ES", 140.0, 55.0),
    zone("FI", 80.0, 50.0),
    zone("FR", 56.0, 27.0),
    zone("GB", 200.0, 45.0),
    zone("HK", 620.0, 2.0),
    zone("IE", 290.0, 40.0),
    zone("IN-WE", 650.0, 15.0),
    zone("IT-CSO", 330.0, 38.0),
    zone("IT-NO", 300.0, 40.0),
    zone("JP-KN", 400.0, 22.0),
    zone("JP-TK", 480.0, 20.0),
    zone("KR", 430.0, 10.0),
    zone("MX", 420.0, 25.0),
    zone("NL", 330.0, 40.0),
    zone("NO-NO1", 30.0, 98.0),
    zone("PL", 700.0, 22.0),
    zone("PT", 160.0, 62.0),
    zone("SE-SE3", 25.0, 68.0),
    zone("SG", 470.0, 3.0),
    zone("US-CAL-CISO", 230.0, 50.0),
    zone("US-FLA-FPL", 400.0, 5.0),
    zone("US-MIDA-PJM", 380.0, 8.0),
    zone("US-MIDW-MISO", 460.0, 20.0),
    zone("US-NW-SCL", 20.0, 90.0),
    zone("US-NY-NYIS", 250.0, 30.0),
    zone("US-TEX-ERCO", 390.0, 30.0),
    zone("ZA", 710.0, 10.0),
];

/// Baseline for a zone id (case-insensitive)
pub fn baseline(zone: &str) -> Option<&'static ZoneBaseline> {
    BASELINES.iter().find(|b| b.zone.eq_ignore_ascii_case(zone.trim()))
}

/// Multiplier for the daily demand curve at a UTC hour.
///
/// Peaks at 18:00 (1.15), bottoms out at 06:00 (0.85).
pub fn daily_factor(hour: u32) -> f64 {
    let phase = (f64::from(hour % 24) - 18.0) / 24.0 * std::f64::consts::TAU;
    1.0 + 0.15 * phase.cos()
}
