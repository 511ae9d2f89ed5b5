//! Seed hashing for deterministic displacement.
//!
//! Pin positions must be stable across renders, sessions, and the
//! JavaScript deployment, so the default hash reproduces the deployed
//! 32-bit rolling hash bit-for-bit. The algorithm sits behind the
//! [`SeedHash`] trait; a deployment without the cross-system stability
//! requirement can substitute any fixed deterministic scheme.

/// Hashes a seed string to a value in the unit interval.
///
/// Implementations must be pure: no wall-clock time, no global
/// randomness. The same seed must map to the same value on every call,
/// in every process.
pub trait SeedHash: Send + Sync {
    /// Maps a seed to `[0, 1]`.
    fn unit_interval(&self, seed: &str) -> f64;
}

/// The deployed 32-bit polynomial rolling hash.
///
/// For each UTF-16 code unit `c`: `h = (h << 5) - h + c`, with all
/// arithmetic wrapping in `i32`, the same overflow behavior as the
/// JavaScript `((hash << 5) - hash + c) | 0`. Normalized as
/// `|h| / 2147483647`.
///
/// The normalization keeps one JavaScript quirk: `Math.abs` of the most
/// negative 32-bit value gives 2147483648, so the unit interval can
/// exceed 1.0 by one part in 2^31. Harmless for angle and radius
/// derivation, and required for cross-system pin stability.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingSeedHash;

impl RollingSeedHash {
    /// The raw signed 32-bit hash of a seed.
    pub fn hash_i32(seed: &str) -> i32 {
        let mut hash: i32 = 0;
        for unit in seed.encode_utf16() {
            hash = hash
                .wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit));
        }
        hash
    }
}

impl SeedHash for RollingSeedHash {
    fn unit_interval(&self, seed: &str) -> f64 {
        (Self::hash_i32(seed) as i64).abs() as f64 / f64::from(i32::MAX)
    }
}
