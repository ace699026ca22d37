//! Multi-source AQI aggregation
//!
//! Fans out to every provider adapter concurrently, waits for all of them to
//! settle, and merges the successful readings into one composite estimate
//! with a confidence tier.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{Instrument, Span, debug, error, info, instrument, warn};

use crate::config::{AirwiseConfig, ProvidersConfig};
use crate::error::AirwiseError;
use crate::models::{
    AggregatedAqi, Confidence, Coordinate, Pollutants, ProviderName, SourceReading,
    SourceSummary,
};
use crate::providers::{self, AirQualityProvider};
use crate::recommendation;

/// Order in which providers fill the merged pollutant set
pub const PROVIDER_PRIORITY: [ProviderName; 2] = [ProviderName::Waqi, ProviderName::IqAir];

/// Distance at which a source's weight has decayed to its floor
const DECAY_DISTANCE_KM: f64 = 20.0;
/// A present source always keeps at least this share of its base weight
const MIN_DISTANCE_FACTOR: f64 = 0.5;

/// Base weight of each provider in the composite AQI
#[derive(Debug, Clone)]
pub struct ProviderWeights {
    weights: HashMap<ProviderName, f64>,
}

impl ProviderWeights {
    /// Weights with no provider recognized
    #[must_use]
    pub fn none() -> Self {
        Self {
            weights: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, provider: ProviderName, weight: f64) -> Self {
        self.weights.insert(provider, weight);
        self
    }

    #[must_use]
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let mut weights = Self::none();
        if let Some(weight) = config.waqi.weight {
            weights = weights.with(ProviderName::Waqi, weight);
        }
        if let Some(weight) = config.iqair.weight {
            weights = weights.with(ProviderName::IqAir, weight);
        }
        weights
    }

    /// Base weight, if the provider is recognized with a positive weight
    #[must_use]
    pub fn get(&self, provider: ProviderName) -> Option<f64> {
        self.weights.get(&provider).copied().filter(|w| *w > 0.0)
    }
}

impl Default for ProviderWeights {
    fn default() -> Self {
        Self::none()
            .with(ProviderName::Waqi, 0.6)
            .with(ProviderName::IqAir, 0.4)
    }
}

/// Linear decay with distance, floored at half the base weight
#[must_use]
pub fn effective_weight(base_weight: f64, distance_km: f64) -> f64 {
    base_weight * (1.0 - distance_km / DECAY_DISTANCE_KM).max(MIN_DISTANCE_FACTOR)
}

/// Distance-weighted composite AQI. Falls back to the first reading's raw AQI
/// when no reading has a recognized weight.
#[must_use]
pub fn weighted_aqi(readings: &[SourceReading], weights: &ProviderWeights) -> Option<u32> {
    let first = readings.first()?;

    let (weighted_sum, total_weight) = readings
        .iter()
        .filter_map(|r| {
            weights
                .get(r.source)
                .map(|base| (r, effective_weight(base, r.distance_km)))
        })
        .fold((0.0, 0.0), |(sum, total), (r, w)| {
            (sum + f64::from(r.aqi) * w, total + w)
        });

    if total_weight > 0.0 {
        Some((weighted_sum / total_weight).round() as u32)
    } else {
        Some(first.aqi)
    }
}

#[must_use]
pub fn confidence(readings: &[SourceReading]) -> Confidence {
    if readings.len() >= 2 && readings.iter().all(|r| r.distance_km < 5.0) {
        Confidence::High
    } else if readings.iter().any(|r| r.distance_km < 10.0) {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Merge pollutant values following [`PROVIDER_PRIORITY`], not invocation order
#[must_use]
pub fn merge_pollutants(readings: &[SourceReading]) -> Pollutants {
    let mut merged = Pollutants::default();
    for provider in PROVIDER_PRIORITY {
        for reading in readings.iter().filter(|r| r.source == provider) {
            merged.fill_missing_from(&reading.pollutants);
        }
    }
    merged
}

/// Build the composite estimate from readings in invocation order
#[must_use]
pub fn aggregate(readings: &[SourceReading], weights: &ProviderWeights) -> AggregatedAqi {
    let Some(aqi) = weighted_aqi(readings, weights) else {
        return AggregatedAqi::empty();
    };

    AggregatedAqi {
        aqi: Some(aqi),
        confidence: confidence(readings),
        nearest_station: readings.first().map(|r| r.station.clone()),
        sources: readings.iter().map(SourceSummary::from).collect(),
        pollutants: merge_pollutants(readings),
        recommendations: recommendation::recommend(Some(aqi)),
    }
}

/// Aggregation engine over a fixed list of provider adapters
pub struct AqiAggregator {
    providers: Vec<Arc<dyn AirQualityProvider>>,
    weights: ProviderWeights,
}

impl AqiAggregator {
    pub fn new(providers: Vec<Arc<dyn AirQualityProvider>>, weights: ProviderWeights) -> Self {
        Self { providers, weights }
    }

    pub fn from_config(config: &AirwiseConfig) -> crate::Result<Self> {
        Ok(Self::new(
            providers::build_providers(config)?,
            ProviderWeights::from_config(&config.providers),
        ))
    }

    /// Query all providers concurrently and merge what they return.
    ///
    /// Every adapter runs in its own task and is awaited to completion, so a
    /// slow or panicking provider never cancels the others. Zero readings is
    /// a valid, empty estimate; `NoResult` is returned only when no adapter
    /// task settled at all.
    #[instrument(skip(self), fields(lat = coord.latitude, lon = coord.longitude))]
    pub async fn composite_aqi(&self, coord: Coordinate) -> crate::Result<AggregatedAqi> {
        let tasks = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            tokio::spawn(async move { provider.fetch(coord).await }.instrument(Span::current()))
        });
        let outcomes = join_all(tasks).await;

        let mut readings = Vec::with_capacity(self.providers.len());
        let mut settled = 0usize;
        for (provider, outcome) in self.providers.iter().zip(outcomes) {
            match outcome {
                Ok(Some(reading)) => {
                    settled += 1;
                    readings.push(reading);
                }
                Ok(None) => {
                    settled += 1;
                    debug!("{} returned no reading", provider.name());
                }
                Err(e) => warn!("{} task failed: {}", provider.name(), e),
            }
        }

        if settled == 0 && !self.providers.is_empty() {
            error!("All {} provider tasks failed", self.providers.len());
            return Err(AirwiseError::NoResult);
        }

        let result = aggregate(&readings, &self.weights);
        info!(
            "Composite AQI {:?} from {} source(s), confidence {:?}",
            result.aqi,
            result.sources.len(),
            result.confidence
        );
        Ok(result)
    }
}
