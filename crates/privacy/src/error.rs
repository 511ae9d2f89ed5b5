//! Error types for the privacy crate.

use thiserror::Error;

/// Result type alias for obfuscation operations.
pub type Result<T> = std::result::Result<T, PrivacyError>;

/// Errors that can occur during location obfuscation.
#[derive(Debug, Error)]
pub enum PrivacyError {
    /// Empty obfuscation seed. There is deliberately no fallback offset:
    /// a shared default would displace unrelated records identically.
    #[error("Obfuscation seed must not be empty")]
    InvalidSeed,

    /// Non-finite or out-of-range input coordinate
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Non-finite or negative obfuscation radius
    #[error("Invalid obfuscation radius: {0}")]
    InvalidRadius(f64),
}

/// Error code for integration with discovery-level error handling.
/// Range: 11xxx for privacy errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivacyErrorCode {
    /// Empty obfuscation seed
    InvalidSeed = 11001,
    /// Non-finite or out-of-range coordinate
    InvalidCoordinate = 11002,
    /// Non-finite or negative radius
    InvalidRadius = 11003,
}

impl PrivacyError {
    /// Returns the error code for this error.
    pub fn code(&self) -> PrivacyErrorCode {
        match self {
            PrivacyError::InvalidSeed => PrivacyErrorCode::InvalidSeed,
            PrivacyError::InvalidCoordinate(_) => PrivacyErrorCode::InvalidCoordinate,
            PrivacyError::InvalidRadius(_) => PrivacyErrorCode::InvalidRadius,
        }
    }
}
