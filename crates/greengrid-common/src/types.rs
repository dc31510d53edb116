//! Value objects shared across crates

use crate::{GridError, GridResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic coordinate (Value Object)
///
/// # Invariants
/// - |latitude| <= 90
/// - |longitude| <= 180
///
/// Fields are public so the type can be deserialized from requests;
/// anything consuming a coordinate calls [`Coordinate::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Documented fallback when the caller's real position is unknown (Berlin)
    pub const DEFAULT_USER: Coordinate = Coordinate {
        latitude: 52.5200,
        longitude: 13.4050,
    };

    /// Create new coordinate with validation
    pub fn new(latitude: f64, longitude: f64) -> GridResult<Self> {
        let coord = Self { latitude, longitude };
        coord.validate()?;
        Ok(coord)
    }

    /// Check range and finiteness
    pub fn validate(&self) -> GridResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GridError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Whether the coordinate is inside the valid range
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// Kind of content being delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Static assets (images, JS, CSS)
    Static,
    /// API responses
    Api,
    /// Video streaming
    Video,
    /// Server-rendered pages
    Dynamic,
    /// Model inference
    Ai,
    /// Database-backed queries
    Database,
}

impl ContentType {
    /// Every registered content type
    pub const ALL: [ContentType; 6] = [
        ContentType::Static,
        ContentType::Api,
        ContentType::Video,
        ContentType::Dynamic,
        ContentType::Ai,
        ContentType::Database,
    ];

    /// Wire name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Api => "api",
            Self::Video => "video",
            Self::Dynamic => "dynamic",
            Self::Ai => "ai",
            Self::Database => "database",
        }
    }
}

impl Default for ContentType {
    fn default() -> Self {
        Self::Static
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|ct| ct.as_str() == key)
            .ok_or_else(|| GridError::UnknownContentType(s.to_string()))
    }
}

/// Where a carbon sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataSource {
    /// Live Electricity Maps API
    ElectricityMaps,
    /// In-memory baseline table
    Static,
    /// Synthetic estimate substituted after a failed fetch
    Fallback,
}

impl DataSource {
    /// Wire name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ElectricityMaps => "electricity-maps",
            Self::Static => "static",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Carbon intensity snapshot for one location. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonSample {
    /// Location name as requested
    pub location: String,
    /// Grid carbon intensity in gCO2/kWh
    pub carbon_intensity: f64,
    /// Renewable share of generation, percent (0-100)
    pub renewable_percentage: f64,
    /// Capture time
    pub captured_at: DateTime<Utc>,
    /// Provenance
    pub source: DataSource,
}

impl CarbonSample {
    /// Create a sample captured now. Negative or non-finite intensities
    /// clamp to zero and the renewable share clamps to 0-100.
    pub fn new(
        location: impl Into<String>,
        carbon_intensity: f64,
        renewable_percentage: f64,
        source: DataSource,
    ) -> Self {
        Self {
            location: location.into(),
            carbon_intensity: non_negative(carbon_intensity),
            renewable_percentage: non_negative(renewable_percentage).min(100.0),
            captured_at: Utc::now(),
            source,
        }
    }

    /// Override capture time
    pub fn captured_at(mut self, at: DateTime<Utc>) -> Self {
        self.captured_at = at;
        self
    }

    /// Whether this is a synthetic fallback estimate
    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
