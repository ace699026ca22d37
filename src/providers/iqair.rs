use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{AirQualityProvider, check_status, parse_aqi, parse_number};
use crate::config::ProviderConfig;
use crate::error::AirwiseError;
use crate::models::{Coordinate, Pollutants, ProviderName, SourceReading};

/// IQAir (AirVisual) nearest-city client
pub struct IqAirProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

/// Response envelope; `data` carries a message object unless `status` is "success"
#[derive(Debug, Deserialize)]
pub struct IqAirResponse {
    pub status: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
pub struct IqAirCity {
    pub city: String,
    pub state: String,
    pub current: IqAirCurrent,
}

#[derive(Debug, Deserialize)]
pub struct IqAirCurrent {
    pub pollution: IqAirPollution,
}

/// Pollution block. Concentrations are only present on paid plans.
#[derive(Debug, Deserialize)]
pub struct IqAirPollution {
    pub ts: Option<String>,
    pub aqius: Value,
    pub pm25: Option<Value>,
    pub pm10: Option<Value>,
    pub o3: Option<Value>,
    pub no2: Option<Value>,
    pub so2: Option<Value>,
    pub co: Option<Value>,
}

impl IqAirProvider {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_reading(&self, api_key: &str, coord: Coordinate) -> crate::Result<SourceReading> {
        let url = format!("{}/v2/nearest_city", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coord.latitude.to_string()),
                ("lon", coord.longitude.to_string()),
                ("key", api_key.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                AirwiseError::provider(ProviderName::IqAir, format!("API request failed: {e}"))
            })?;

        check_status(ProviderName::IqAir, &response)?;

        let body: IqAirResponse = response.json().await.map_err(|e| {
            AirwiseError::provider(
                ProviderName::IqAir,
                format!("Failed to parse IQAir response: {e}"),
            )
        })?;

        body.into_reading()
    }
}

impl IqAirResponse {
    /// Convert a nearest-city response into a reading. Only `status == "success"` counts.
    pub fn into_reading(self) -> crate::Result<SourceReading> {
        if self.status != "success" {
            let detail = self.data["message"]
                .as_str()
                .or_else(|| self.data.as_str())
                .unwrap_or("no details");
            return Err(AirwiseError::provider(
                ProviderName::IqAir,
                format!("status '{}': {detail}", self.status),
            ));
        }

        let city: IqAirCity = serde_json::from_value(self.data).map_err(|e| {
            AirwiseError::provider(ProviderName::IqAir, format!("Malformed city data: {e}"))
        })?;

        let pollution = city.current.pollution;
        let aqi = parse_aqi(&pollution.aqius).ok_or_else(|| {
            AirwiseError::provider(
                ProviderName::IqAir,
                format!("No US AQI for {}, {}", city.city, city.state),
            )
        })?;

        Ok(SourceReading {
            source: ProviderName::IqAir,
            aqi,
            // nearest_city does not report a station distance
            distance_km: 0.0,
            station: format!("{}, {}", city.city, city.state),
            timestamp: pollution.ts.unwrap_or_else(|| Utc::now().to_rfc3339()),
            pollutants: Pollutants {
                pm25: parse_number(pollution.pm25.as_ref()),
                pm10: parse_number(pollution.pm10.as_ref()),
                o3: parse_number(pollution.o3.as_ref()),
                no2: parse_number(pollution.no2.as_ref()),
                so2: parse_number(pollution.so2.as_ref()),
                co: parse_number(pollution.co.as_ref()),
            },
        })
    }
}

#[async_trait]
impl AirQualityProvider for IqAirProvider {
    fn name(&self) -> ProviderName {
        ProviderName::IqAir
    }

    #[instrument(name = "iqair_fetch", skip(self), fields(lat = coord.latitude, lon = coord.longitude))]
    async fn fetch(&self, coord: Coordinate) -> Option<SourceReading> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("IQAir API key not configured, skipping");
            return None;
        };

        match self.fetch_reading(api_key, coord).await {
            Ok(reading) => {
                debug!("IQAir reading {} from {}", reading.aqi, reading.station);
                Some(reading)
            }
            Err(e) => {
                warn!("IQAir API error: {}", e);
                None
            }
        }
    }
}
