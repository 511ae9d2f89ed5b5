//! Error types for the discovery crate.

use crate::store::StoreError;
use foodshare_geo::GeoError;
use foodshare_privacy::PrivacyError;
use thiserror::Error;

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Errors that can occur during discovery orchestration.
///
/// A stale response is not represented here: a generation mismatch on
/// arrival is a discard signal handled inside the coordinator, not a
/// failure surfaced to the consumer.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Invalid geometry input (non-finite viewport, coordinate, or radius)
    #[error(transparent)]
    Geometry(#[from] GeoError),

    /// Obfuscation refused (empty seed, unusable coordinate)
    #[error(transparent)]
    Privacy(#[from] PrivacyError),

    /// A settled query failed at the record store. Surfaced to the
    /// consumer as recoverable; the coordinator never retries, and the
    /// previously delivered result set remains the latest.
    #[error("Query for generation {generation} failed: {source}")]
    QueryFailed {
        /// Generation tag of the failed query
        generation: u64,
        /// The store-side failure, propagated unchanged
        #[source]
        source: StoreError,
    },

    /// Invalid coordinator configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Error code for discovery-level errors. Range: 12xxx; geo and privacy
/// errors keep their own 10xxx/11xxx codes.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryErrorCode {
    /// Settled query failed at the store
    QueryFailed = 12001,
    /// Invalid coordinator configuration
    InvalidConfig = 12002,
}

impl DiscoveryError {
    /// Returns the numeric error code, delegating to the nested crate's
    /// range where the error originated there.
    pub fn code(&self) -> u32 {
        match self {
            DiscoveryError::Geometry(e) => e.code() as u32,
            DiscoveryError::Privacy(e) => e.code() as u32,
            DiscoveryError::QueryFailed { .. } => DiscoveryErrorCode::QueryFailed as u32,
            DiscoveryError::InvalidConfig(_) => DiscoveryErrorCode::InvalidConfig as u32,
        }
    }
}
