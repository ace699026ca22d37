use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Activity;
use crate::models::Coordinate;

/// Per-activity suitability of the surroundings, 0.0 to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmenityScores {
    pub jogging: f64,
    pub walking: f64,
    pub cycling: f64,
}

impl AmenityScores {
    #[must_use]
    pub fn for_activity(&self, activity: Activity) -> f64 {
        match activity {
            Activity::Jogging => self.jogging,
            Activity::Walking => self.walking,
            Activity::Cycling => self.cycling,
        }
    }
}

/// Source of amenity scores for a location, e.g. a places API
#[async_trait]
pub trait AmenityScorer: Send + Sync {
    async fn scores(&self, coord: Coordinate) -> AmenityScores;
}

/// Same scores everywhere; stands in until a places data source exists
#[derive(Debug, Clone)]
pub struct FixedAmenities {
    scores: AmenityScores,
}

impl FixedAmenities {
    #[must_use]
    pub fn new(scores: AmenityScores) -> Self {
        Self { scores }
    }
}

impl Default for FixedAmenities {
    fn default() -> Self {
        Self::new(AmenityScores {
            jogging: 0.8,
            walking: 0.9,
            cycling: 0.7,
        })
    }
}

#[async_trait]
impl AmenityScorer for FixedAmenities {
    async fn scores(&self, _coord: Coordinate) -> AmenityScores {
        self.scores
    }
}
