//! Deterministic coordinate displacement.

use crate::error::{PrivacyError, Result};
use crate::hash::{RollingSeedHash, SeedHash};
use foodshare_geo::{lat_degrees_per_km, lon_degrees_per_km, Coordinate};
use std::f64::consts::TAU;

/// Default maximum displacement between a true and displayed coordinate.
pub const DEFAULT_OBFUSCATION_RADIUS_KM: f64 = 2.0;

/// Displaces coordinates by a deterministic, seed-derived offset.
///
/// The offset is a pure function of `(coordinate, seed, radius)`: no
/// wall-clock time, no global randomness. That determinism is the privacy
/// property, not a shortcut: because every query returns the identical
/// displaced point, a single observation is an adversary's entire
/// advantage, and repeated queries never average out toward the true
/// location. Resampling per request would create exactly that leak.
///
/// The displacement distance is drawn uniformly from `[0, radius]`, which
/// concentrates displaced points near the true coordinate rather than
/// spreading them uniformly over the disk. This matches the deployed
/// algorithm; changing it would move every published pin.
pub struct LocationObfuscator<H: SeedHash = RollingSeedHash> {
    hasher: H,
    radius_km: f64,
}

impl LocationObfuscator {
    /// Creates an obfuscator with the default hash and the given radius.
    pub fn new(radius_km: f64) -> Self {
        Self { hasher: RollingSeedHash, radius_km }
    }
}

impl Default for LocationObfuscator {
    fn default() -> Self {
        Self::new(DEFAULT_OBFUSCATION_RADIUS_KM)
    }
}

impl<H: SeedHash> LocationObfuscator<H> {
    /// Creates an obfuscator with a custom seed hash.
    ///
    /// Only for deployments with no cross-system pin stability
    /// requirement; the default [`RollingSeedHash`] matches the positions
    /// already published by the JavaScript implementation.
    pub fn with_hasher(hasher: H, radius_km: f64) -> Self {
        Self { hasher, radius_km }
    }

    /// The configured obfuscation radius in kilometres.
    #[must_use]
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Displaces a coordinate by a seed-derived offset within the radius.
    ///
    /// Two independent unit-interval values are derived from the seed
    /// (`seed + "_angle"` and `seed + "_radius"`), converted to a polar
    /// displacement, and applied through the equirectangular
    /// approximation anchored at the true latitude. The result is always
    /// a valid coordinate: latitude is clamped at the poles and longitude
    /// wraps across the antimeridian.
    ///
    /// # Arguments
    /// * `coordinate` - The true location, never disclosed
    /// * `seed` - Stable per-record identifier (e.g. the record id)
    ///
    /// # Errors
    /// `InvalidSeed` for an empty seed, `InvalidCoordinate` /
    /// `InvalidRadius` for unusable numeric inputs.
    pub fn obfuscate(&self, coordinate: &Coordinate, seed: &str) -> Result<Coordinate> {
        if seed.is_empty() {
            return Err(PrivacyError::InvalidSeed);
        }
        if !coordinate.is_valid() {
            return Err(PrivacyError::InvalidCoordinate(format!(
                "({}, {})",
                coordinate.latitude, coordinate.longitude
            )));
        }
        if !self.radius_km.is_finite() || self.radius_km < 0.0 {
            return Err(PrivacyError::InvalidRadius(self.radius_km));
        }

        let angle = self.hasher.unit_interval(&format!("{seed}_angle")) * TAU;
        let distance_km = self.hasher.unit_interval(&format!("{seed}_radius")) * self.radius_km;

        let d_lat = distance_km * angle.sin() * lat_degrees_per_km();
        let d_lon = distance_km * angle.cos() * lon_degrees_per_km(coordinate.latitude);

        Ok(Coordinate::new(
            (coordinate.latitude + d_lat).clamp(-90.0, 90.0),
            wrap_longitude(coordinate.longitude + d_lon),
        ))
    }
}

/// Convenience wrapper using the default hash.
///
/// # Example
/// ```
/// use foodshare_privacy::obfuscate;
/// use foodshare_geo::{haversine_distance, Coordinate};
///
/// let home = Coordinate::new(51.0447, -114.0719);
/// let pin = obfuscate(&home, "event-123", 2.0).unwrap();
///
/// assert!(haversine_distance(&home, &pin) <= 2.0 + 1e-6);
/// ```
pub fn obfuscate(coordinate: &Coordinate, seed: &str, radius_km: f64) -> Result<Coordinate> {
    LocationObfuscator::new(radius_km).obfuscate(coordinate, seed)
}

/// Wraps a longitude into [-180, 180].
///
/// In-range values pass through untouched so a zero displacement is a
/// bit-exact identity.
fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodshare_geo::haversine_distance;
    use proptest::prelude::*;

    const HOME: Coordinate = Coordinate { latitude: 51.0447, longitude: -114.0719 };

    #[test]
    fn test_deterministic_across_calls() {
        let first = obfuscate(&HOME, "event-123", 2.0).unwrap();
        let second = obfuscate(&HOME, "event-123", 2.0).unwrap();

        assert_eq!(first.latitude.to_bits(), second.latitude.to_bits());
        assert_eq!(first.longitude.to_bits(), second.longitude.to_bits());
    }

    // Position captured from the deployed implementation; pins must not
    // move across releases.
    #[test]
    fn test_matches_deployed_position() {
        let pin = obfuscate(&HOME, "event-123", 2.0).unwrap();

        assert!((pin.latitude - 51.04733391083428).abs() < 1e-9, "lat {}", pin.latitude);
        assert!((pin.longitude - (-114.09973901030587)).abs() < 1e-9, "lon {}", pin.longitude);
        assert!((haversine_distance(&HOME, &pin) - 1.9681).abs() < 0.001);
    }

    #[test]
    fn test_within_radius() {
        let pin = obfuscate(&HOME, "event-123", 2.0).unwrap();
        assert!(haversine_distance(&HOME, &pin) <= 2.0 + 1e-6);
    }

    #[test]
    fn test_distinct_seeds_diverge() {
        let a = obfuscate(&HOME, "event-123", 2.0).unwrap();
        let b = obfuscate(&HOME, "event-124", 2.0).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_seed_rejected() {
        assert!(matches!(
            obfuscate(&HOME, "", 2.0),
            Err(PrivacyError::InvalidSeed)
        ));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let off_globe = Coordinate::new(91.0, 0.0);
        assert!(matches!(
            obfuscate(&off_globe, "event-123", 2.0),
            Err(PrivacyError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            obfuscate(&HOME, "event-123", -1.0),
            Err(PrivacyError::InvalidRadius(_))
        ));
        assert!(obfuscate(&HOME, "event-123", f64::NAN).is_err());
    }

    #[test]
    fn test_zero_radius_is_identity() {
        let pin = obfuscate(&HOME, "event-123", 0.0).unwrap();
        assert_eq!(pin, HOME);
    }

    #[test]
    fn test_pole_stays_valid() {
        let pole = Coordinate::new(90.0, 0.0);
        let pin = obfuscate(&pole, "event-123", 2.0).unwrap();
        assert!(pin.is_valid());
    }

    #[test]
    fn test_antimeridian_wraps() {
        // This seed displaces slightly east, pushing the pin across ±180°
        let edge = Coordinate::new(0.0, 179.99999);
        let pin = obfuscate(&edge, "record-42", 5.0).unwrap();

        assert!(pin.is_valid());
        assert!(pin.longitude < 0.0, "expected wrap, got {}", pin.longitude);
        // A wrapped pin is still within the radius on the sphere
        assert!(haversine_distance(&edge, &pin) <= 5.0 + 1e-6);
    }

    #[test]
    fn test_custom_hasher_is_honored() {
        struct FixedHash;
        impl SeedHash for FixedHash {
            fn unit_interval(&self, _seed: &str) -> f64 {
                0.5
            }
        }

        let obfuscator = LocationObfuscator::with_hasher(FixedHash, 2.0);
        let pin = obfuscator.obfuscate(&HOME, "anything").unwrap();
        // angle = π, distance = 1 km: due west of the true point
        assert!((haversine_distance(&HOME, &pin) - 1.0).abs() < 0.01);
        assert!(pin.longitude < HOME.longitude);
        assert!((pin.latitude - HOME.latitude).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_within_radius_and_valid(
            lat in -80.0f64..80.0,
            lon in -179.0f64..179.0,
            radius in 0.0f64..10.0,
            seed in "[a-z0-9-]{1,24}",
        ) {
            let coord = Coordinate::new(lat, lon);
            let pin = obfuscate(&coord, &seed, radius).unwrap();

            prop_assert!(pin.is_valid());
            // Slack for the equirectangular approximation, whose east-west
            // error grows with tan(lat); ~0.2% at 80°
            prop_assert!(haversine_distance(&coord, &pin) <= radius * 1.005 + 1e-9);
        }

        #[test]
        fn prop_extreme_latitudes_stay_valid(
            lat in 80.0f64..90.0,
            seed in "[a-z0-9-]{1,24}",
        ) {
            let coord = Coordinate::new(lat, 0.0);
            let pin = obfuscate(&coord, &seed, 2.0).unwrap();
            prop_assert!(pin.is_valid());
        }

        #[test]
        fn prop_repeated_calls_bit_identical(
            lat in -89.0f64..89.0,
            lon in -179.0f64..179.0,
            seed in "[a-z0-9-]{1,24}",
        ) {
            let coord = Coordinate::new(lat, lon);
            let a = obfuscate(&coord, &seed, 2.0).unwrap();
            let b = obfuscate(&coord, &seed, 2.0).unwrap();
            prop_assert_eq!(a.latitude.to_bits(), b.latitude.to_bits());
            prop_assert_eq!(a.longitude.to_bits(), b.longitude.to_bits());
        }
    }
}
