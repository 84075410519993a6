//! WGS84 coordinates and great-circle helpers.
//!
//! All coordinates are degrees, longitude first (GeoJSON order).
//! Distances are meters on a spherical Earth.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS84 position fix or route coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Location {
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
}

impl Location {
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Reject NaN or infinite components.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(GeometryError::NonFinite {
                lon: self.lon,
                lat: self.lat,
            })
        }
    }
}

impl From<[f64; 2]> for Location {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self::new(lon, lat)
    }
}

impl From<Location> for [f64; 2] {
    fn from(loc: Location) -> Self {
        [loc.lon, loc.lat]
    }
}

impl From<(f64, f64)> for Location {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self::new(lon, lat)
    }
}

/// Wrap a longitude, or a longitude difference, into [-180, 180).
pub fn normalize_lon(lon: f64) -> f64 {
    if (-180.0..180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Haversine great-circle distance in meters.
pub fn distance_meters(a: Location, b: Location) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Initial great-circle bearing from `a` to `b` in degrees [0, 360).
pub fn bearing(a: Location, b: Location) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Point reached by travelling `distance_m` from `origin` on `bearing_deg`.
///
/// The returned longitude is wrapped into [-180, 180).
pub fn destination(origin: Location, bearing_deg: f64, distance_m: f64) -> Location {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    Location::new(normalize_lon(lon2.to_degrees()), lat2.to_degrees())
}

/// Total haversine length of a polyline in meters.
pub fn line_length(line: &[Location]) -> f64 {
    line.windows(2)
        .map(|w| distance_meters(w[0], w[1]))
        .sum()
}

/// Validate a polyline: at least two coordinates, all finite.
pub fn validate_line(line: &[Location]) -> Result<(), GeometryError> {
    if line.len() < 2 {
        return Err(GeometryError::EmptyLine(line.len()));
    }
    line.iter().try_for_each(Location::validate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_same_point() {
        let p = Location::new(-118.5, 34.02);
        assert!(distance_meters(p, p).abs() < 1e-9);
    }

    #[test]
    fn test_distance_known() {
        // One degree of latitude is ~111.2 km on the mean sphere
        let a = Location::new(0.0, 0.0);
        let b = Location::new(0.0, 1.0);
        assert_relative_eq!(distance_meters(a, b), 111_195.08, epsilon = 1.0);
    }

    #[test]
    fn test_bearing_cardinal() {
        let origin = Location::new(0.0, 0.0);
        assert_relative_eq!(bearing(origin, Location::new(1.0, 0.0)), 90.0, epsilon = 1e-9);
        assert_relative_eq!(bearing(origin, Location::new(0.0, 1.0)), 0.0, epsilon = 1e-9);
        assert_relative_eq!(bearing(origin, Location::new(0.0, -1.0)), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_destination_distance_consistent() {
        let origin = Location::new(-118.506, 34.0225);
        for bearing_deg in [0.0, 45.0, 90.0, 200.0, 315.0] {
            let p = destination(origin, bearing_deg, 20.0);
            assert_relative_eq!(distance_meters(origin, p), 20.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_normalize_lon() {
        assert_eq!(normalize_lon(-118.5), -118.5);
        assert_eq!(normalize_lon(180.0), -180.0);
        assert_relative_eq!(normalize_lon(190.0), -170.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_lon(-190.0), 170.0, epsilon = 1e-12);
        assert_relative_eq!(normalize_lon(-359.999), 0.001, epsilon = 1e-9);
    }

    #[test]
    fn test_destination_wraps_antimeridian() {
        let east = destination(Location::new(179.9995, 0.0), 90.0, 200.0);
        assert!((-180.0..180.0).contains(&east.lon));
        assert_relative_eq!(east.lon, -179.9987, epsilon = 1e-4);

        let west = destination(Location::new(-179.9995, 0.0), 270.0, 200.0);
        assert!((-180.0..180.0).contains(&west.lon));
        assert_relative_eq!(west.lon, 179.9987, epsilon = 1e-4);
    }

    #[test]
    fn test_distance_across_antimeridian() {
        let a = Location::new(179.9995, 0.0);
        let b = Location::new(-179.9995, 0.0);
        // 0.001 degrees of longitude on the equator, not most of the globe
        assert_relative_eq!(distance_meters(a, b), 111.195, epsilon = 0.01);
        assert_relative_eq!(bearing(a, b), 90.0, epsilon = 1e-6);
    }

    #[test]
    fn test_validate_line() {
        let a = Location::new(0.0, 0.0);
        assert_eq!(validate_line(&[a]), Err(GeometryError::EmptyLine(1)));
        assert!(validate_line(&[a, a]).is_ok());
        assert!(matches!(
            validate_line(&[a, Location::new(f64::NAN, 0.0)]),
            Err(GeometryError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_location_serde_pair() {
        let loc: Location = serde_json::from_str("[-118.5, 34.02]").unwrap();
        assert_eq!(loc, Location::new(-118.5, 34.02));
        assert_eq!(serde_json::to_string(&loc).unwrap(), "[-118.5,34.02]");
    }
}
