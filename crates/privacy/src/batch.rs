//! Batch pin obfuscation with optional parallelism.
//!
//! Map views render the displaced pin for every discoverable record in the
//! current bounds at once; this module displaces them in bulk, in parallel
//! when the `parallel` feature (default) is enabled.

use crate::error::Result;
use crate::hash::SeedHash;
use crate::obfuscate::LocationObfuscator;
use foodshare_geo::Coordinate;
use serde::{Deserialize, Serialize};

/// A record awaiting pin displacement.
#[derive(Debug, Clone, Deserialize)]
pub struct PinRequest {
    /// Stable record identifier, used as the obfuscation seed
    pub id: String,
    /// The record's true coordinate
    pub coordinate: Coordinate,
}

/// The displaced pin for a single record.
///
/// `coordinate` is `None` when the record could not be displaced (empty
/// id, unusable location); such records must not be rendered, and there
/// is no fallback offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinResult {
    /// The record identifier
    pub id: String,
    /// Displaced coordinate, or `None` if obfuscation was refused
    pub coordinate: Option<Coordinate>,
}

/// Displaces a batch of pins.
///
/// # Arguments
/// * `obfuscator` - The configured obfuscator (radius, hash)
/// * `pins` - Records with their true coordinates
///
/// # Returns
/// One result per input pin, in input order.
///
/// # Example
/// ```
/// use foodshare_geo::Coordinate;
/// use foodshare_privacy::batch::{obfuscate_pins, PinRequest};
/// use foodshare_privacy::LocationObfuscator;
///
/// let pins = vec![
///     PinRequest { id: "event-123".into(), coordinate: Coordinate::new(51.0447, -114.0719) },
///     PinRequest { id: String::new(), coordinate: Coordinate::new(51.05, -114.08) },
/// ];
///
/// let results = obfuscate_pins(&LocationObfuscator::default(), &pins);
/// assert!(results[0].coordinate.is_some());
/// assert!(results[1].coordinate.is_none()); // empty id is refused
/// ```
pub fn obfuscate_pins<H: SeedHash>(
    obfuscator: &LocationObfuscator<H>,
    pins: &[PinRequest],
) -> Vec<PinResult> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        pins.par_iter()
            .map(|pin| displace_single(obfuscator, pin))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        pins.iter()
            .map(|pin| displace_single(obfuscator, pin))
            .collect()
    }
}

/// Displaces pins, keeping only the renderable ones.
///
/// Convenience over [`obfuscate_pins`] for callers that have no use for
/// the refusals.
pub fn obfuscate_pins_renderable<H: SeedHash>(
    obfuscator: &LocationObfuscator<H>,
    pins: &[PinRequest],
) -> Vec<PinResult> {
    obfuscate_pins(obfuscator, pins)
        .into_iter()
        .filter(|pin| pin.coordinate.is_some())
        .collect()
}

#[inline]
fn displace_single<H: SeedHash>(
    obfuscator: &LocationObfuscator<H>,
    pin: &PinRequest,
) -> PinResult {
    let displaced: Result<Coordinate> = obfuscator.obfuscate(&pin.coordinate, &pin.id);
    PinResult {
        id: pin.id.clone(),
        coordinate: displaced.ok(),
    }
}
