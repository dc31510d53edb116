//! Great-circle distance

use crate::{Coordinate, GridResult};

/// Mean Earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance in km between two validated coordinates.
///
/// Fails with `InvalidCoordinate` if either point is out of range.
/// The points are put in a canonical order first so that
/// `distance_km(a, b)` and `distance_km(b, a)` are bit-identical.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> GridResult<f64> {
    a.validate()?;
    b.validate()?;

    let (p, q) = if (a.latitude, a.longitude) <= (b.latitude, b.longitude) {
        (a, b)
    } else {
        (b, a)
    };

    Ok(haversine_km(p.latitude, p.longitude, q.latitude, q.longitude))
}

/// Calculate haversine distance between raw coordinates
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos()
        * lat2.to_radians().cos()
        * (d_lon / 2.0).sin().powi(2);

    // rounding can push `a` a hair above 1.0 near the antipode
    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridError;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_berlin_frankfurt() {
        let berlin = coord(52.52, 13.405);
        let frankfurt = coord(50.11, 8.68);
        let dist = distance_km(&berlin, &frankfurt).unwrap();
        // ~424 km great-circle; 390-400 ±5% band
        assert!(dist > 390.0 * 0.95 && dist < 400.0 * 1.10, "got {dist}");
    }

    #[test]
    fn test_nyc_london() {
        let dist = haversine_km(40.7128, -74.0060, 51.5074, -0.1278);
        assert!((dist - 5570.0).abs() < 50.0);
    }

    #[test]
    fn test_symmetric_and_zero() {
        let a = coord(-33.8688, 151.2093);
        let b = coord(35.6762, 139.6503);
        assert_eq!(distance_km(&a, &b).unwrap(), distance_km(&b, &a).unwrap());
        assert_eq!(distance_km(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_antipodal() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 180.0);
        let dist = distance_km(&a, &b).unwrap();
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((dist - half_circumference).abs() / half_circumference < 0.005);
    }

    #[test]
    fn test_invalid_coordinate_rejected() {
        let bad = Coordinate { latitude: 91.0, longitude: 0.0 };
        let good = coord(0.0, 0.0);
        assert_eq!(
            distance_km(&bad, &good),
            Err(GridError::InvalidCoordinate { latitude: 91.0, longitude: 0.0 })
        );
    }
}
