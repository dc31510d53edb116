//! City gazetteer
//!
//! Resolves location names to grid zones and coordinates. Edge
//! locations reference these cities by name, so this one table feeds
//! both the edge registry and user-location resolution.

use greengrid_common::{Coordinate, GridError, GridResult};

/// A city with known position and electricity grid zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownCity {
    /// City name
    pub name: &'static str,
    /// ISO 3166 alpha-2 country code
    pub country: &'static str,
    /// Grid zone identifier (Electricity Maps zone key)
    pub zone: &'static str,
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
}

impl KnownCity {
    /// Position of the city
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

const fn city(
    name: &'static str,
    country: &'static str,
    zone: &'static str,
    latitude: f64,
    longitude: f64,
) -> KnownCity {
    KnownCity { name, country, zone, latitude, longitude }
}

/// Every city the service can resolve
pub static CITIES: &[KnownCity] = &[
    // Europe
    city("Berlin", "DE", "DE", 52.5200, 13.4050),
    city("Frankfurt", "DE", "DE", 50.1109, 8.6821),
    city("Munich", "DE", "DE", 48.1351, 11.5820),
    city("Hamburg", "DE", "DE", 53.5511, 9.9937),
    city("Paris", "FR", "FR", 48.8566, 2.3522),
    city("Marseille", "FR", "FR", 43.2965, 5.3698),
    city("London", "GB", "GB", 51.5074, -0.1278),
    city("Manchester", "GB", "GB", 53.4808, -2.2426),
    city("Dublin", "IE", "IE", 53.3498, -6.2603),
    city("Amsterdam", "NL", "NL", 52.3676, 4.9041),
    city("Brussels", "BE", "BE", 50.8503, 4.3517),
    city("Madrid", "ES", "ES", 40.4168, -3.7038),
    city("Lisbon", "PT", "PT", 38.7223, -9.1393),
    city("Milan", "IT", "IT-NO", 45.4642, 9.1900),
    city("Rome", "IT", "IT-CSO", 41.9028, 12.4964),
    city("Zurich", "CH", "CH", 47.3769, 8.5417),
    city("Vienna", "AT", "AT", 48.2082, 16.3738),
    city("Warsaw", "PL", "PL", 52.2297, 21.0122),
    city("Prague", "CZ", "CZ", 50.0755, 14.4378),
    city("Stockholm", "SE", "SE-SE3", 59.3293, 18.0686),
    city("Oslo", "NO", "NO-NO1", 59.9139, 10.7522),
    city("Copenhagen", "DK", "DK-DK2", 55.6761, 12.5683),
    city("Helsinki", "FI", "FI", 60.1699, 24.9384),
    // North America
    city("New York", "US", "US-NY-NYIS", 40.7128, -74.0060),
    city("Ashburn", "US", "US-MIDA-PJM", 39.0438, -77.4874),
    city("Chicago", "US", "US-MIDW-MISO", 41.8781, -87.6298),
    city("Dallas", "US", "US-TEX-ERCO", 32.7767, -96.7970),
    city("Los Angeles", "US", "US-CAL-CISO", 34.0522, -118.2437),
    city("San Francisco", "US", "US-CAL-CISO", 37.7749, -122.4194),
    city("Seattle", "US", "US-NW-SCL", 47.6062, -122.3321),
    city("Miami", "US", "US-FLA-FPL", 25.7617, -80.1918),
    city("Toronto", "CA", "CA-ON", 43.6532, -79.3832),
    city("Montreal", "CA", "CA-QC", 45.5017, -73.5673),
    city("Mexico City", "MX", "MX", 19.4326, -99.1332),
    // South America
    city("Sao Paulo", "BR", "BR-CS", -23.5505, -46.6333),
    // Asia-Pacific
    city("Tokyo", "JP", "JP-TK", 35.6762, 139.6503),
    city("Osaka", "JP", "JP-KN", 34.6937, 135.5023),
    city("Seoul", "KR", "KR", 37.5665, 126.9780),
    city("Singapore", "SG", "SG", 1.3521, 103.8198),
    city("Hong Kong", "HK", "HK", 22.3193, 114.1694),
    city("Mumbai", "IN", "IN-WE", 19.0760, 72.8777),
    city("Sydney", "AU", "AU-NSW", -33.8688, 151.2093),
    city("Melbourne", "AU", "AU-VIC", -37.8136, 144.9631),
    // Africa / Middle East
    city("Johannesburg", "ZA", "ZA", -26.2041, 28.0473),
    city("Dubai", "AE", "AE", 25.2048, 55.2708),
];

/// Find a city by name (case-insensitive, surrounding whitespace ignored)
pub fn find_city(name: &str) -> Option<&'static KnownCity> {
    let name = name.trim();
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Canonical zone id if `zone` names a known grid zone
pub fn known_zone(zone: &str) -> Option<&'static str> {
    let zone = zone.trim();
    CITIES
        .iter()
        .find(|c| c.zone.eq_ignore_ascii_case(zone))
        .map(|c| c.zone)
}

/// Resolve a city name or a grid-zone id to a grid zone
pub fn resolve_zone(location: &str) -> GridResult<&'static str> {
    find_city(location)
        .map(|c| c.zone)
        .or_else(|| known_zone(location))
        .ok_or_else(|| GridError::UnknownLocation(location.to_string()))
}

/// Position of a known city
pub fn resolve_coordinate(location: &str) -> Option<Coordinate> {
    find_city(location).map(KnownCity::coordinate)
}
