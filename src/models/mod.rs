//! Data models for the Airwise service
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: Geographic positions
//! - Reading: Normalized provider readings and pollutant sets
//! - Aggregate: The composite estimate built from all readings

pub mod aggregate;
pub mod coordinate;
pub mod reading;

// Re-export all public types for convenient access
pub use aggregate::{AggregatedAqi, Confidence, SourceSummary};
pub use coordinate::Coordinate;
pub use reading::{Pollutants, ProviderName, SourceReading};
