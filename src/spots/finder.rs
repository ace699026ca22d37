use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::InMemoryState;
use governor::state::direct::NotKeyed;
use governor::{Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::{Activity, AmenityScorer, AmenityScores, build_grid};
use crate::aggregation::AqiAggregator;
use crate::config::SpotsConfig;
use crate::geo::haversine_km;
use crate::models::{Confidence, Coordinate};
use crate::recommendation;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

const AQI_WEIGHT: f64 = 0.4;
const DISTANCE_WEIGHT: f64 = 0.3;
const AMENITY_WEIGHT: f64 = 0.3;
/// AQI at which the air quality score reaches zero
const AQI_SCORE_CEILING: f64 = 150.0;

/// A grid cell suitable for outdoor activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSpot {
    pub location: Coordinate,
    pub aqi: u32,
    /// Distance from the search center in km
    pub distance: f64,
    pub best_time: String,
    pub confidence: Confidence,
    pub amenities: AmenityScores,
    pub score: f64,
}

/// Weighted blend of air quality, proximity and amenities
#[must_use]
pub fn spot_score(aqi: u32, distance_km: f64, radius_km: f64, amenity: f64) -> f64 {
    let aqi_score = (1.0 - f64::from(aqi) / AQI_SCORE_CEILING).max(0.0);
    let distance_score = (1.0 - distance_km / radius_km).max(0.0);

    AQI_WEIGHT * aqi_score + DISTANCE_WEIGHT * distance_score + AMENITY_WEIGHT * amenity
}

/// Stable sort by descending score, then keep the best `limit`
#[must_use]
pub fn rank_spots(mut spots: Vec<RankedSpot>, limit: usize) -> Vec<RankedSpot> {
    spots.sort_by(|a, b| b.score.total_cmp(&a.score));
    spots.truncate(limit);
    spots
}

/// Sweeps a grid around a center and ranks the cells with acceptable air.
///
/// Cells are queried one after another, each waiting on a rate limiter
/// sized to the providers' quota.
pub struct SpotFinder {
    aggregator: Arc<AqiAggregator>,
    amenities: Arc<dyn AmenityScorer>,
    settings: SpotsConfig,
    limiter: Option<DirectRateLimiter>,
}

impl SpotFinder {
    pub fn new(
        aggregator: Arc<AqiAggregator>,
        amenities: Arc<dyn AmenityScorer>,
        settings: SpotsConfig,
    ) -> Self {
        let limiter = Quota::with_period(Duration::from_millis(settings.request_interval_ms))
            .map(RateLimiter::direct);

        Self {
            aggregator,
            amenities,
            settings,
            limiter,
        }
    }

    #[instrument(skip(self), fields(lat = center.latitude, lon = center.longitude))]
    pub async fn find_spots(&self, center: Coordinate, activity: Activity) -> Vec<RankedSpot> {
        let grid = build_grid(
            center,
            self.settings.radius_steps,
            self.settings.grid_step_degrees,
        );
        info!("Sweeping {} grid cells for {}", grid.len(), activity);

        let mut candidates = Vec::new();
        for cell in grid {
            if let Some(limiter) = &self.limiter {
                limiter.until_ready().await;
            }

            let estimate = match self.aggregator.composite_aqi(cell).await {
                Ok(estimate) => estimate,
                Err(e) => {
                    warn!("Skipping cell {}: {}", cell.format_coordinates(), e);
                    continue;
                }
            };

            let Some(aqi) = estimate.aqi else {
                debug!("No AQI for cell {}", cell.format_coordinates());
                continue;
            };
            if aqi > self.settings.max_aqi {
                continue;
            }

            let amenities = self.amenities.scores(cell).await;
            let distance = haversine_km(center, cell);
            let score = spot_score(
                aqi,
                distance,
                self.settings.radius_km,
                amenities.for_activity(activity),
            );

            candidates.push(RankedSpot {
                location: cell,
                aqi,
                distance,
                best_time: recommendation::best_time(Some(aqi)).to_string(),
                confidence: estimate.confidence,
                amenities,
                score,
            });
        }

        info!("{} cells passed the AQI filter", candidates.len());
        rank_spots(candidates, self.settings.max_results)
    }
}
