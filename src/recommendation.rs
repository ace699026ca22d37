//! Outdoor activity recommendations derived from a composite AQI

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suitability {
    pub suitable: bool,
}

/// Per-activity suitability and timing advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub jogging: Suitability,
    pub walking: Suitability,
    pub cycling: Suitability,
    pub best_time: String,
    pub alternatives: Vec<String>,
}

/// Best time of day to be outdoors for a given AQI
#[must_use]
pub fn best_time(aqi: Option<u32>) -> &'static str {
    match aqi {
        Some(0..=50) => "Any time during the day",
        Some(51..=100) => "Early morning or evening",
        Some(101..=150) => "Early morning only",
        Some(_) | None => "Not recommended",
    }
}

/// Map a composite AQI to activity advice. `None` yields the all-unsuitable default.
#[must_use]
pub fn recommend(aqi: Option<u32>) -> Recommendation {
    let (jogging, walking, cycling) = match aqi {
        Some(0..=100) => (true, true, true),
        Some(101..=150) => (false, true, false),
        Some(_) | None => (false, false, false),
    };

    let alternatives: &[&str] = match aqi {
        None | Some(0..=50) => &[],
        Some(51..=100) => &["Indoor gym"],
        Some(101..=150) => &["Indoor activities"],
        Some(_) => &["Indoor activities", "Swimming", "Indoor sports"],
    };

    Recommendation {
        jogging: Suitability { suitable: jogging },
        walking: Suitability { suitable: walking },
        cycling: Suitability { suitable: cycling },
        best_time: best_time(aqi).to_string(),
        alternatives: alternatives.iter().map(|a| (*a).to_string()).collect(),
    }
}
