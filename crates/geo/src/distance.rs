//! Distance calculation and the equirectangular small-distance approximation.
//!
//! The Haversine formula gives the great-circle distance between two points
//! on a sphere. The equirectangular helpers convert kilometres to angular
//! degrees over short ranges; the anchor-radius bounding box and the
//! location obfuscator both go through them so the two use one identical
//! approximation.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Minimum value for `cos(latitude)` in longitude conversions.
///
/// The longitude correction divides by `cos(lat)`, which approaches zero
/// at the poles; clamping keeps longitude deltas bounded there.
pub const MIN_COS_LAT: f64 = 1e-6;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// # Arguments
/// * `from` - Starting coordinate
/// * `to` - Ending coordinate
///
/// # Returns
/// Distance in kilometers
///
/// # Example
/// ```
/// use foodshare_geo::{haversine_distance, Coordinate};
///
/// let calgary = Coordinate::new(51.0447, -114.0719);
/// let edmonton = Coordinate::new(53.5461, -113.4938);
///
/// let distance = haversine_distance(&calgary, &edmonton);
/// assert!((distance - 281.0).abs() < 5.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Degrees of latitude spanned by one kilometre.
///
/// Constant everywhere on the sphere under the equirectangular
/// approximation.
#[inline]
pub fn lat_degrees_per_km() -> f64 {
    (1.0 / EARTH_RADIUS_KM).to_degrees()
}

/// Degrees of longitude spanned by one kilometre at the given latitude.
///
/// Meridians converge toward the poles, so a kilometre covers more degrees
/// of longitude at higher latitudes. `cos(lat)` is clamped to
/// [`MIN_COS_LAT`] to keep the result finite at ±90°.
///
/// # Arguments
/// * `latitude` - Latitude in degrees where the conversion is anchored
#[inline]
pub fn lon_degrees_per_km(latitude: f64) -> f64 {
    let cos_lat = latitude.to_radians().cos().abs().max(MIN_COS_LAT);
    (1.0 / (EARTH_RADIUS_KM * cos_lat)).to_degrees()
}
