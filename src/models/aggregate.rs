//! Composite AQI estimate returned by the aggregation engine

use serde::{Deserialize, Serialize};

use super::{Pollutants, ProviderName, SourceReading};
use crate::recommendation::{self, Recommendation};

/// Coarse reliability label for a composite AQI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Per-source entry of a composite estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub name: ProviderName,
    pub aqi: u32,
    /// Station distance in km
    pub distance: f64,
    pub station: String,
    pub pollutants: Pollutants,
}

impl From<&SourceReading> for SourceSummary {
    fn from(reading: &SourceReading) -> Self {
        Self {
            name: reading.source,
            aqi: reading.aqi,
            distance: reading.distance_km,
            station: reading.station.clone(),
            pollutants: reading.pollutants,
        }
    }
}

/// Weighted composite of all providers that answered for one coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedAqi {
    pub aqi: Option<u32>,
    pub confidence: Confidence,
    /// Station of the first successful source in invocation order
    pub nearest_station: Option<String>,
    pub sources: Vec<SourceSummary>,
    pub pollutants: Pollutants,
    pub recommendations: Recommendation,
}

impl AggregatedAqi {
    /// Result for a query where no provider delivered a reading
    #[must_use]
    pub fn empty() -> Self {
        Self {
            aqi: None,
            confidence: Confidence::Low,
            nearest_station: None,
            sources: Vec::new(),
            pollutants: Pollutants::default(),
            recommendations: recommendation::recommend(None),
        }
    }

    /// Whether at least one provider contributed
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.sources.is_empty()
    }
}
