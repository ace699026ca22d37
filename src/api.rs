//! HTTP API routes
//!
//! `GET /aqi/current` serves the composite AQI for a coordinate and
//! `GET /spots` the ranked outdoor spots around it.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::aggregation::AqiAggregator;
use crate::config::AirwiseConfig;
use crate::error::AirwiseError;
use crate::models::{AggregatedAqi, Coordinate};
use crate::spots::{Activity, FixedAmenities, RankedSpot, SpotFinder};

const NO_SPOTS_NOTE: &str = "No suitable outdoor locations found. Consider indoor activities.";
const SPOTS_NOTE: &str = "Listed spots are ordered by suitability.";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<AqiAggregator>,
    pub spot_finder: Arc<SpotFinder>,
}

impl AppState {
    pub fn new(aggregator: Arc<AqiAggregator>, spot_finder: Arc<SpotFinder>) -> Self {
        Self {
            aggregator,
            spot_finder,
        }
    }

    /// Wire up the configured providers and a spot finder sharing them
    pub fn from_config(config: &AirwiseConfig) -> crate::Result<Self> {
        let aggregator = Arc::new(AqiAggregator::from_config(config)?);
        let spot_finder = Arc::new(SpotFinder::new(
            Arc::clone(&aggregator),
            Arc::new(FixedAmenities::default()),
            config.spots.clone(),
        ));
        Ok(Self::new(aggregator, spot_finder))
    }
}

#[derive(Debug, Deserialize)]
pub struct CoordinateQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpotsQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub activity: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpotsResponse {
    pub spots: Vec<RankedSpot>,
    pub timestamp: String,
    pub note: String,
}

/// Maps service errors onto status codes and JSON bodies
pub struct ApiError(AirwiseError);

impl From<AirwiseError> for ApiError {
    fn from(err: AirwiseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            AirwiseError::Validation { .. } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.0.user_message() }),
            ),
            AirwiseError::NoResult => (
                StatusCode::NOT_FOUND,
                json!({ "error": self.0.user_message() }),
            ),
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "message": other.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/aqi/current", get(get_current_aqi))
        .route("/spots", get(get_spots))
        .with_state(state)
}

/// Parse raw `lat`/`lon` query values into a checked coordinate
pub fn parse_coordinate(lat: Option<&str>, lon: Option<&str>) -> crate::Result<Coordinate> {
    let (Some(lat), Some(lon)) = (non_empty(lat), non_empty(lon)) else {
        return Err(AirwiseError::validation(
            "Missing required parameters: lat and lon",
        ));
    };

    let latitude: f64 = lat
        .parse()
        .map_err(|_| AirwiseError::validation(format!("lat must be a number, got: {lat}")))?;
    let longitude: f64 = lon
        .parse()
        .map_err(|_| AirwiseError::validation(format!("lon must be a number, got: {lon}")))?;

    Coordinate::new(latitude, longitude)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

async fn get_current_aqi(
    State(state): State<AppState>,
    Query(query): Query<CoordinateQuery>,
) -> Result<Json<AggregatedAqi>, ApiError> {
    let coord = parse_coordinate(query.lat.as_deref(), query.lon.as_deref())?;
    let result = state.aggregator.composite_aqi(coord).await?;
    Ok(Json(result))
}

async fn get_spots(
    State(state): State<AppState>,
    Query(query): Query<SpotsQuery>,
) -> Result<Json<SpotsResponse>, ApiError> {
    let center = parse_coordinate(query.lat.as_deref(), query.lon.as_deref())?;
    let activity: Activity = non_empty(query.activity.as_deref())
        .ok_or_else(|| AirwiseError::validation("Missing required parameter: activity"))?
        .parse()?;

    let spots = state.spot_finder.find_spots(center, activity).await;
    let note = if spots.is_empty() {
        NO_SPOTS_NOTE
    } else {
        SPOTS_NOTE
    };

    Ok(Json(SpotsResponse {
        spots,
        timestamp: Utc::now().to_rfc3339(),
        note: note.to_string(),
    }))
}
