use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GeoscopeError, Result};

/// A WGS84 latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Create a coordinate, validating latitude in [-90, 90] and longitude in [-180, 180]
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if is_valid_range(lat, lng) {
            Ok(Self { lat, lng })
        } else {
            Err(GeoscopeError::InvalidCoordinate { lat, lng })
        }
    }

    /// Create a coordinate by clamping both components into the valid range.
    ///
    /// NaN components are mapped to zero.
    pub fn clamped(lat: f64, lng: f64) -> Self {
        let lat = if lat.is_nan() { 0.0 } else { lat.clamp(-90.0, 90.0) };
        let lng = if lng.is_nan() { 0.0 } else { lng.clamp(-180.0, 180.0) };
        Self { lat, lng }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Check whether the values form a valid coordinate
pub fn is_valid_range(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// Unvalidated wire form of a coordinate
#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoscopeError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate { lat: c.lat, lng: c.lng }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinate() {
        let c = Coordinate::new(48.85, 2.35).unwrap();
        assert_eq!(c.lat(), 48.85);
        assert_eq!(c.lng(), 2.35);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_invalid_coordinate() {
        assert!(matches!(
            Coordinate::new(90.5, 0.0),
            Err(GeoscopeError::InvalidCoordinate { .. })
        ));
        assert!(Coordinate::new(0.0, -180.1).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_clamped() {
        let c = Coordinate::clamped(150.0, -200.0);
        assert_eq!(c.lat(), 90.0);
        assert_eq!(c.lng(), -180.0);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let ok: Coordinate = serde_json::from_str(r#"{"lat": 10.0, "lng": 20.0}"#).unwrap();
        assert_eq!(ok.lat(), 10.0);

        let bad = serde_json::from_str::<Coordinate>(r#"{"lat": 100.0, "lng": 20.0}"#);
        assert!(bad.is_err());
    }
}
