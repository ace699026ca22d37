//! `Airwise` - multi-source air quality for outdoor activities
//!
//! This library aggregates AQI readings from several providers into one
//! composite estimate with a confidence tier, derives activity
//! recommendations, and searches a grid around a location for the best
//! outdoor spots.

pub mod aggregation;
pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod providers;
pub mod recommendation;
pub mod spots;
pub mod web;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export core types for public API
pub use aggregation::{AqiAggregator, ProviderWeights};
pub use config::AirwiseConfig;
pub use error::AirwiseError;
pub use models::{AggregatedAqi, Confidence, Coordinate, Pollutants, ProviderName, SourceReading};
pub use providers::AirQualityProvider;
pub use recommendation::Recommendation;
pub use spots::{Activity, RankedSpot, SpotFinder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AirwiseError>;
