//! Coordinator configuration.

use crate::error::{DiscoveryError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable for the settle window in milliseconds.
pub const ENV_SETTLE_MS: &str = "FOODSHARE_DISCOVERY_SETTLE_MS";
/// Environment variable for the obfuscation radius in kilometres.
pub const ENV_OBFUSCATION_RADIUS_KM: &str = "FOODSHARE_DISCOVERY_OBFUSCATION_RADIUS_KM";
/// Environment variable for the default anchor-search radius in kilometres.
pub const ENV_ANCHOR_RADIUS_KM: &str = "FOODSHARE_DISCOVERY_ANCHOR_RADIUS_KM";
/// Environment variable for the per-query result cap.
pub const ENV_MAX_RESULTS: &str = "FOODSHARE_DISCOVERY_MAX_RESULTS";

/// Configuration for a [`GeoQueryCoordinator`](crate::GeoQueryCoordinator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Quiet window after the last viewport change before a query fires
    pub settle_ms: u64,
    /// Maximum displacement applied to non-owner coordinates
    pub obfuscation_radius_km: f64,
    /// Default radius for anchor (geocoded address) searches
    pub anchor_radius_km: f64,
    /// Per-query result cap passed through to the record store
    pub max_results: Option<usize>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            settle_ms: 400,
            obfuscation_radius_km: 2.0,
            anchor_radius_km: 20.0,
            max_results: None,
        }
    }
}

impl DiscoveryConfig {
    /// The settle window as a [`Duration`].
    #[must_use]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Loads configuration from the environment, falling back to defaults
    /// for unset variables.
    ///
    /// # Errors
    /// `InvalidConfig` for unparseable values or a configuration that
    /// fails [`validate`](Self::validate).
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(ENV_SETTLE_MS) {
            config.settle_ms = value
                .parse()
                .map_err(|_| invalid(ENV_SETTLE_MS, &value, "an integer"))?;
        }
        if let Ok(value) = std::env::var(ENV_OBFUSCATION_RADIUS_KM) {
            config.obfuscation_radius_km = value
                .parse()
                .map_err(|_| invalid(ENV_OBFUSCATION_RADIUS_KM, &value, "a number"))?;
        }
        if let Ok(value) = std::env::var(ENV_ANCHOR_RADIUS_KM) {
            config.anchor_radius_km = value
                .parse()
                .map_err(|_| invalid(ENV_ANCHOR_RADIUS_KM, &value, "a number"))?;
        }
        if let Ok(value) = std::env::var(ENV_MAX_RESULTS) {
            config.max_results = Some(
                value
                    .parse()
                    .map_err(|_| invalid(ENV_MAX_RESULTS, &value, "an integer"))?,
            );
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// A zero obfuscation radius is rejected here even though the
    /// obfuscator accepts it: a coordinator configured with zero would
    /// deliver true coordinates to non-owners.
    pub fn validate(&self) -> Result<()> {
        if self.settle_ms == 0 {
            return Err(DiscoveryError::InvalidConfig(
                "settle_ms must be greater than zero".into(),
            ));
        }
        if !self.obfuscation_radius_km.is_finite() || self.obfuscation_radius_km <= 0.0 {
            return Err(DiscoveryError::InvalidConfig(format!(
                "obfuscation_radius_km must be a positive number, got {}",
                self.obfuscation_radius_km
            )));
        }
        if !self.anchor_radius_km.is_finite() || self.anchor_radius_km <= 0.0 {
            return Err(DiscoveryError::InvalidConfig(format!(
                "anchor_radius_km must be a positive number, got {}",
                self.anchor_radius_km
            )));
        }
        if self.max_results == Some(0) {
            return Err(DiscoveryError::InvalidConfig(
                "max_results must be greater than zero when set".into(),
            ));
        }
        Ok(())
    }
}

fn invalid(var: &str, value: &str, expected: &str) -> DiscoveryError {
    DiscoveryError::InvalidConfig(format!("{var} must be {expected}, got '{value}'"))
}
