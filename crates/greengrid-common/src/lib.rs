//! GreenGrid Common - Shared types for dual-grid carbon routing
//!
//! This crate provides the value objects every other GreenGrid crate
//! speaks in:
//! - Geographic coordinates and great-circle distance
//! - Carbon intensity samples and their provenance
//! - Content types
//! - The error taxonomy
//!
//! # Dual-grid model
//!
//! ```text
//!   user grid zone                         edge grid zone
//!  ┌──────────────┐   transmission    ┌──────────────┐
//!  │  CarbonSample│ ◄───────────────► │  CarbonSample│
//!  │  (user side) │                   │  (edge side) │
//!  └──────┬───────┘                   └──────┬───────┘
//!         │        weight profile            │
//!         └────────────► blend ◄─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod geo;
pub mod types;

pub use error::*;
pub use geo::{distance_km, haversine_km, EARTH_RADIUS_KM};
pub use types::*;
