//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Non-finite or out-of-range coordinate, viewport, or radius input.
    /// Callers must skip the query rather than execute it with NaN/Inf.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid WKT format
    #[error("Invalid WKT format: {0}")]
    InvalidWkt(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with discovery-level error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Non-finite or out-of-range geometry input
    InvalidGeometry = 10001,
    /// Invalid WKT format
    InvalidWkt = 10002,
    /// JSON parsing error
    JsonParsing = 10003,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidGeometry(_) => GeoErrorCode::InvalidGeometry,
            GeoError::InvalidWkt(_) => GeoErrorCode::InvalidWkt,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}
