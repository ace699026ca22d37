//! Outdoor spot finder
//!
//! This module samples the composite AQI over a grid around a center point
//! and ranks the cells for an outdoor activity:
//! - Grid construction around the center
//! - Amenity scoring behind an injectable strategy
//! - Rate-limited sequential sweep and multi-factor ranking

pub mod amenities;
pub mod finder;
pub mod grid;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AirwiseError;

pub use amenities::{AmenityScorer, AmenityScores, FixedAmenities};
pub use finder::{RankedSpot, SpotFinder, rank_spots, spot_score};
pub use grid::build_grid;

/// Outdoor activities a spot can be ranked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Jogging,
    Walking,
    Cycling,
}

impl Activity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Jogging => "jogging",
            Activity::Walking => "walking",
            Activity::Cycling => "cycling",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activity {
    type Err = AirwiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jogging" => Ok(Activity::Jogging),
            "walking" => Ok(Activity::Walking),
            "cycling" => Ok(Activity::Cycling),
            other => Err(AirwiseError::validation(format!(
                "Unknown activity '{other}'. Must be one of: jogging, walking, cycling"
            ))),
        }
    }
}
