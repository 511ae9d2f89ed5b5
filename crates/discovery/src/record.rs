//! Record types and the disclosure rules applied before delivery.
//!
//! Two separate rules protect a listing's location:
//! - the true coordinate is replaced by a deterministic displaced one for
//!   every viewer except the record's owner
//! - address-level fields are withheld from non-owners entirely
//!
//! [`GeoRecord`] deliberately does not implement `Serialize`: the
//! store-side shape with the true coordinate can never end up in a
//! response by accident. Only [`ObfuscatedRecord`] leaves the system.

use chrono::{DateTime, Utc};
use foodshare_geo::{parse_location, Coordinate};
use foodshare_privacy::{LocationObfuscator, Result as PrivacyResult, SeedHash};
use serde::{Deserialize, Serialize};

/// Address-level fields, disclosed to the record's owner only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    /// Full formatted address line
    pub formatted: Option<String>,
    /// Street name
    pub street: Option<String>,
    /// House number
    pub house_number: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
}

/// A discoverable record as stored, with its true coordinate.
///
/// `coordinate` and `address` are privileged data. This type is
/// `Deserialize`-only; see the module docs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoRecord {
    /// Stable record identifier; also the obfuscation seed
    pub id: String,
    /// Identifier of the owning user, if any
    pub owner_id: Option<String>,
    /// The true location, never disclosed to non-owners
    pub coordinate: Coordinate,
    /// Address fields, never disclosed to non-owners
    pub address: Option<Address>,
    /// Creation instant, used by date filters
    pub created_at: Option<DateTime<Utc>>,
    /// Opaque application payload, passed through untouched
    pub metadata: serde_json::Value,
}

impl GeoRecord {
    /// Builds a record from a store row whose location column is a
    /// PostGIS payload (GeoJSON object or WKT string).
    ///
    /// Returns `None` when the location is missing or unusable; a record
    /// without a location cannot be discovered.
    pub fn from_row(
        id: impl Into<String>,
        owner_id: Option<String>,
        location: &serde_json::Value,
        created_at: Option<DateTime<Utc>>,
        metadata: serde_json::Value,
    ) -> Option<Self> {
        let coordinate = parse_location(location)?;
        Some(Self {
            id: id.into(),
            owner_id,
            coordinate,
            address: None,
            created_at,
            metadata,
        })
    }

    /// Applies the disclosure rules for the given viewer.
    ///
    /// The owner receives the true coordinate and address. Everyone else
    /// receives the seed-displaced coordinate (seed = record id) and no
    /// address.
    ///
    /// # Errors
    /// Propagates obfuscation refusals (empty record id, unusable
    /// coordinate); the caller must drop the record rather than deliver
    /// it undisplaced.
    pub fn redact_for<H: SeedHash>(
        self,
        viewer: Option<&str>,
        obfuscator: &LocationObfuscator<H>,
    ) -> PrivacyResult<ObfuscatedRecord> {
        let is_owner = match (&self.owner_id, viewer) {
            (Some(owner), Some(viewer)) => owner == viewer,
            _ => false,
        };

        let (coordinate, address) = if is_owner {
            (self.coordinate, self.address)
        } else {
            (obfuscator.obfuscate(&self.coordinate, &self.id)?, None)
        };

        Ok(ObfuscatedRecord {
            id: self.id,
            coordinate,
            is_owner,
            address,
            created_at: self.created_at,
            metadata: self.metadata,
        })
    }
}

/// A record as delivered to the consumer.
///
/// For non-owners `coordinate` is the displaced pin position and
/// `address` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObfuscatedRecord {
    /// Stable record identifier
    pub id: String,
    /// Displayed coordinate: true for the owner, displaced otherwise
    pub coordinate: Coordinate,
    /// Whether the viewer owns this record
    pub is_owner: bool,
    /// Address fields; present for the owner only
    pub address: Option<Address>,
    /// Creation instant
    pub created_at: Option<DateTime<Utc>>,
    /// Opaque application payload
    pub metadata: serde_json::Value,
}

/// Optional date range, passed through unchanged to the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateFilter {
    /// Inclusive lower bound
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound
    pub end: Option<DateTime<Utc>>,
}

impl DateFilter {
    /// Returns true if an instant satisfies the filter.
    ///
    /// A record without a date fails any bounded filter.
    pub fn matches(&self, instant: Option<DateTime<Utc>>) -> bool {
        if self.start.is_none() && self.end.is_none() {
            return true;
        }
        let Some(instant) = instant else {
            return false;
        };
        if let Some(start) = self.start {
            if instant < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if instant > end {
                return false;
            }
        }
        true
    }
}

/// The store-facing query issued once per settled burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsQuery {
    /// Rectangular query region
    pub bounds: foodshare_geo::BoundingBox,
    /// Optional date range
    pub date_filter: Option<DateFilter>,
    /// Optional result cap
    pub limit: Option<usize>,
}
