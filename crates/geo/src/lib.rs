//! Geospatial primitives for FoodShare discovery queries.
//!
//! This crate provides:
//! - Validated coordinate and map viewport types
//! - Bounding-box calculators for viewport and point-radius queries
//! - Haversine distance calculation
//! - PostGIS POINT parsing (JSON and WKT formats)
//!
//! # Example
//!
//! ```
//! use foodshare_geo::{BoundingBox, Coordinate, Viewport};
//!
//! let viewport = Viewport::new(Coordinate::new(51.0447, -114.0719), 11.0);
//! let bounds = BoundingBox::from_viewport(&viewport).unwrap();
//!
//! assert!(bounds.contains(&viewport.center));
//! ```

mod bbox;
mod distance;
mod error;
mod postgis;

pub use bbox::{BoundingBox, BASE_LAT_HALF_DEG, BASE_LON_HALF_DEG, REFERENCE_ZOOM};
pub use distance::{
    haversine_distance, lat_degrees_per_km, lon_degrees_per_km, EARTH_RADIUS_KM, MIN_COS_LAT,
};
pub use error::{GeoError, GeoErrorCode, Result};
pub use postgis::{parse_location, parse_wkt_point};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate is finite and within valid ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Validates the coordinate, returning `InvalidGeometry` if it is
    /// non-finite or out of range.
    pub fn validate(&self) -> Result<()> {
        if !self.is_valid() {
            return Err(GeoError::InvalidGeometry(format!(
                "coordinate out of range: ({}, {})",
                self.latitude, self.longitude
            )));
        }
        Ok(())
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// The map camera: center coordinate and zoom level.
///
/// Owned by the consumer and mutated on every pan/zoom gesture; the
/// discovery engine only ever reads it. Pitch and bearing do not affect
/// query bounds and are not carried here.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// The center of the map view
    pub center: Coordinate,
    /// The current zoom level (0 = whole world, larger = closer)
    pub zoom: f64,
}

impl Viewport {
    /// Creates a new viewport.
    #[inline]
    pub fn new(center: Coordinate, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Validates the viewport, returning `InvalidGeometry` for a
    /// non-finite center, or a non-finite or negative zoom.
    ///
    /// Callers must skip the query on error rather than issuing a
    /// degenerate bounding box.
    pub fn validate(&self) -> Result<()> {
        self.center.validate()?;
        if !self.zoom.is_finite() || self.zoom < 0.0 {
            return Err(GeoError::InvalidGeometry(format!(
                "invalid zoom level: {}",
                self.zoom
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(51.0447, -114.0719);
        assert_eq!(coord.latitude, 51.0447);
        assert_eq!(coord.longitude, -114.0719);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 181.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (51.0447, -114.0719).into();
        assert_eq!(coord.latitude, 51.0447);
    }

    #[test]
    fn test_viewport_validation() {
        let center = Coordinate::new(51.0447, -114.0719);
        assert!(Viewport::new(center, 11.0).validate().is_ok());
        assert!(Viewport::new(center, 0.0).validate().is_ok());
        assert!(Viewport::new(center, -1.0).validate().is_err());
        assert!(Viewport::new(center, f64::NAN).validate().is_err());
        assert!(
            Viewport::new(Coordinate::new(f64::NAN, 0.0), 11.0)
                .validate()
                .is_err()
        );
    }
}
