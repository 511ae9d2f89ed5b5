//! Privacy-preserving geospatial discovery for FoodShare listings.
//!
//! This crate turns map viewports and geocoded address searches into
//! debounced, generation-tagged queries against a record store, and
//! redacts every result before it leaves the system: non-owners only ever
//! see a deterministically displaced coordinate and no address fields.
//!
//! The moving parts:
//! - [`GeoQueryCoordinator`] collapses viewport bursts into single
//!   settled queries and discards out-of-order responses
//! - [`RecordStore`] is the seam to the application-owned store
//!   (PostGIS in production, [`MemoryStore`] here and in tests)
//! - [`ResultSink`] is the seam to the consumer (map/list UI)
//!
//! Geometry lives in `foodshare-geo`, the displacement algorithm in
//! `foodshare-privacy`.

mod config;
mod coordinator;
mod error;
mod record;
mod store;

pub use config::{
    DiscoveryConfig, ENV_ANCHOR_RADIUS_KM, ENV_MAX_RESULTS, ENV_OBFUSCATION_RADIUS_KM,
    ENV_SETTLE_MS,
};
pub use coordinator::{GeoQueryCoordinator, Phase, ResultSink};
pub use error::{DiscoveryError, DiscoveryErrorCode, Result};
pub use record::{Address, BoundsQuery, DateFilter, GeoRecord, ObfuscatedRecord};
pub use store::{MemoryStore, RecordStore, StoreError, StoreResult};

// Re-exported geometry types that appear in this crate's public API
pub use foodshare_geo::{BoundingBox, Coordinate, Viewport};
