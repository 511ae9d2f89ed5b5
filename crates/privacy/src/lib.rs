//! Deterministic location obfuscation for FoodShare listings.
//!
//! A listing's true coordinate is privileged: it is someone's home. Before
//! a coordinate leaves the system for a non-owner it is displaced by a
//! fixed, seed-derived offset so the listing stays discoverable on a map
//! without disclosing the address.
//!
//! This crate provides:
//! - The seeded displacement algorithm, bit-compatible with the deployed
//!   JavaScript implementation
//! - A swappable seed-hash trait for deployments without that
//!   compatibility constraint
//! - Batch pin displacement with optional parallelism
//!
//! # Example
//!
//! ```
//! use foodshare_geo::{haversine_distance, Coordinate};
//! use foodshare_privacy::obfuscate;
//!
//! let home = Coordinate::new(51.0447, -114.0719);
//! let pin = obfuscate(&home, "event-123", 2.0).unwrap();
//!
//! // Stable across calls, sessions, and processes
//! assert_eq!(pin, obfuscate(&home, "event-123", 2.0).unwrap());
//! assert!(haversine_distance(&home, &pin) <= 2.0 + 1e-6);
//! ```

pub mod batch;
mod error;
mod hash;
mod obfuscate;

pub use error::{PrivacyError, PrivacyErrorCode, Result};
pub use hash::{RollingSeedHash, SeedHash};
pub use obfuscate::{obfuscate, LocationObfuscator, DEFAULT_OBFUSCATION_RADIUS_KM};
