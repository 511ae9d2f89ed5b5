//! Bounding-box calculation for discovery queries.
//!
//! Two query shapes produce a rectangular lat/lon region:
//! - a map viewport (center + zoom), converted with an inverse
//!   power-of-two falloff calibrated against the visible map extent
//! - an anchor point + radius (a geocoded address search), converted with
//!   the equirectangular approximation

use crate::distance::{lat_degrees_per_km, lon_degrees_per_km};
use crate::{Coordinate, GeoError, Result, Viewport};
use serde::{Deserialize, Serialize};

/// Zoom level at which the base half-widths match the visible map extent.
pub const REFERENCE_ZOOM: f64 = 11.0;

/// Latitude half-width of the query box at [`REFERENCE_ZOOM`], in degrees.
pub const BASE_LAT_HALF_DEG: f64 = 0.18;

/// Longitude half-width of the query box at [`REFERENCE_ZOOM`], in degrees.
pub const BASE_LON_HALF_DEG: f64 = 0.36;

/// An axis-aligned lat/lon rectangle used as a spatial query predicate.
///
/// Invariants: `min_lat <= max_lat`, `min_lon <= max_lon`, and all four
/// values within coordinate range. Derived from a viewport or anchor
/// search, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Creates a bounding box, validating its invariants.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self> {
        let bounds = Self { min_lat, max_lat, min_lon, max_lon };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Computes the query region for a map viewport.
    ///
    /// Half-widths fall off with an inverse power of two as zoom increases:
    /// `base / 2^(zoom - REFERENCE_ZOOM)`. Latitude is clamped to
    /// [-90, 90] and longitude to [-180, 180].
    ///
    /// Wraparound across the ±180° meridian is not handled: a viewport
    /// centered near the antimeridian gets a truncated box rather than a
    /// pair of boxes, so results on the far side of the meridian are
    /// missed. Acceptable at current deployment latitudes.
    ///
    /// # Errors
    /// `InvalidGeometry` for a non-finite center or a non-finite or
    /// negative zoom; callers must skip the query.
    ///
    /// # Example
    /// ```
    /// use foodshare_geo::{BoundingBox, Coordinate, Viewport};
    ///
    /// let viewport = Viewport::new(Coordinate::new(51.0447, -114.0719), 11.0);
    /// let bounds = BoundingBox::from_viewport(&viewport).unwrap();
    /// assert!((bounds.lat_span() - 0.36).abs() < 1e-12);
    /// ```
    pub fn from_viewport(viewport: &Viewport) -> Result<Self> {
        viewport.validate()?;

        let falloff = (REFERENCE_ZOOM - viewport.zoom).exp2();
        let lat_half = BASE_LAT_HALF_DEG * falloff;
        let lon_half = BASE_LON_HALF_DEG * falloff;

        Ok(Self::clamped(
            viewport.center.latitude - lat_half,
            viewport.center.latitude + lat_half,
            viewport.center.longitude - lon_half,
            viewport.center.longitude + lon_half,
        ))
    }

    /// Computes the query region for a point-radius search.
    ///
    /// Uses the equirectangular approximation: the latitude delta is
    /// constant per kilometre, the longitude delta is corrected by
    /// `cos(lat)` with the shared pole guard, so the box stays bounded
    /// near ±90°.
    ///
    /// # Arguments
    /// * `point` - Anchor coordinate (e.g. a geocoded address)
    /// * `radius_km` - Search radius in kilometres
    ///
    /// # Errors
    /// `InvalidGeometry` for an invalid anchor or a non-finite or negative
    /// radius.
    pub fn from_anchor_radius(point: &Coordinate, radius_km: f64) -> Result<Self> {
        point.validate()?;
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(GeoError::InvalidGeometry(format!(
                "invalid search radius: {radius_km}"
            )));
        }

        let lat_delta = radius_km * lat_degrees_per_km();
        let lon_delta = radius_km * lon_degrees_per_km(point.latitude);

        Ok(Self::clamped(
            point.latitude - lat_delta,
            point.latitude + lat_delta,
            point.longitude - lon_delta,
            point.longitude + lon_delta,
        ))
    }

    /// Returns true if the coordinate lies within this box (inclusive).
    #[inline]
    pub fn contains(&self, coord: &Coordinate) -> bool {
        coord.latitude >= self.min_lat
            && coord.latitude <= self.max_lat
            && coord.longitude >= self.min_lon
            && coord.longitude <= self.max_lon
    }

    /// Latitude span in degrees.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude span in degrees.
    #[inline]
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Angular area in square degrees.
    #[inline]
    pub fn angular_area(&self) -> f64 {
        self.lat_span() * self.lon_span()
    }

    fn clamped(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat: min_lat.clamp(-90.0, 90.0),
            max_lat: max_lat.clamp(-90.0, 90.0),
            min_lon: min_lon.clamp(-180.0, 180.0),
            max_lon: max_lon.clamp(-180.0, 180.0),
        }
    }

    fn validate(&self) -> Result<()> {
        let finite = self.min_lat.is_finite()
            && self.max_lat.is_finite()
            && self.min_lon.is_finite()
            && self.max_lon.is_finite();
        let ordered = self.min_lat <= self.max_lat && self.min_lon <= self.max_lon;
        let in_range = self.min_lat >= -90.0
            && self.max_lat <= 90.0
            && self.min_lon >= -180.0
            && self.max_lon <= 180.0;

        if !(finite && ordered && in_range) {
            return Err(GeoError::InvalidGeometry(format!(
                "invalid bounding box: lat [{}, {}], lon [{}, {}]",
                self.min_lat, self.max_lat, self.min_lon, self.max_lon
            )));
        }
        Ok(())
    }
}
