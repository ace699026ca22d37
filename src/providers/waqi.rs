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

/// World Air Quality Index (aqicn.org) feed client
pub struct WaqiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

/// Response envelope; `data` is an error string unless `status` is "ok"
#[derive(Debug, Deserialize)]
pub struct WaqiResponse {
    pub status: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
pub struct WaqiFeed {
    pub aqi: Value,
    pub city: WaqiCity,
    pub time: Option<WaqiTime>,
    #[serde(default)]
    pub iaqi: WaqiIaqi,
}

#[derive(Debug, Deserialize)]
pub struct WaqiCity {
    pub name: String,
    pub distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct WaqiTime {
    pub iso: Option<String>,
}

/// Individual pollutant readings, each shaped `{ "v": <number> }`
#[derive(Debug, Default, Deserialize)]
pub struct WaqiIaqi {
    pub pm25: Option<WaqiValue>,
    pub pm10: Option<WaqiValue>,
    pub o3: Option<WaqiValue>,
    pub no2: Option<WaqiValue>,
    pub so2: Option<WaqiValue>,
    pub co: Option<WaqiValue>,
}

#[derive(Debug, Deserialize)]
pub struct WaqiValue {
    /// Usually numeric, but stations emit placeholders like "-"
    pub v: Option<Value>,
}

impl WaqiProvider {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_reading(&self, api_key: &str, coord: Coordinate) -> crate::Result<SourceReading> {
        let url = format!(
            "{}/feed/geo:{};{}/?token={}",
            self.base_url,
            coord.latitude,
            coord.longitude,
            urlencoding::encode(api_key)
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            AirwiseError::provider(ProviderName::Waqi, format!("API request failed: {e}"))
        })?;

        check_status(ProviderName::Waqi, &response)?;

        let body: WaqiResponse = response.json().await.map_err(|e| {
            AirwiseError::provider(
                ProviderName::Waqi,
                format!("Failed to parse WAQI response: {e}"),
            )
        })?;

        body.into_reading()
    }
}

impl WaqiResponse {
    /// Convert a feed response into a reading. Only `status == "ok"` counts as success.
    pub fn into_reading(self) -> crate::Result<SourceReading> {
        if self.status != "ok" {
            let detail = self.data.as_str().unwrap_or("no details");
            return Err(AirwiseError::provider(
                ProviderName::Waqi,
                format!("status '{}': {detail}", self.status),
            ));
        }

        let feed: WaqiFeed = serde_json::from_value(self.data).map_err(|e| {
            AirwiseError::provider(ProviderName::Waqi, format!("Malformed feed data: {e}"))
        })?;

        let aqi = parse_aqi(&feed.aqi).ok_or_else(|| {
            AirwiseError::provider(
                ProviderName::Waqi,
                format!("Station {} reports no AQI ({})", feed.city.name, feed.aqi),
            )
        })?;

        let timestamp = feed
            .time
            .and_then(|t| t.iso)
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        let value =
            |reading: Option<WaqiValue>| parse_number(reading.and_then(|r| r.v).as_ref());
        let iaqi = feed.iaqi;

        Ok(SourceReading {
            source: ProviderName::Waqi,
            aqi,
            distance_km: feed.city.distance.unwrap_or(0.0),
            station: feed.city.name,
            timestamp,
            pollutants: Pollutants {
                pm25: value(iaqi.pm25),
                pm10: value(iaqi.pm10),
                o3: value(iaqi.o3),
                no2: value(iaqi.no2),
                so2: value(iaqi.so2),
                co: value(iaqi.co),
            },
        })
    }
}

#[async_trait]
impl AirQualityProvider for WaqiProvider {
    fn name(&self) -> ProviderName {
        ProviderName::Waqi
    }

    #[instrument(name = "waqi_fetch", skip(self), fields(lat = coord.latitude, lon = coord.longitude))]
    async fn fetch(&self, coord: Coordinate) -> Option<SourceReading> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("WAQI API key not configured, skipping");
            return None;
        };

        match self.fetch_reading(api_key, coord).await {
            Ok(reading) => {
                debug!("WAQI reading {} from {}", reading.aqi, reading.station);
                Some(reading)
            }
            Err(e) => {
                warn!("WAQI API error: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AirwiseConfig;
    use serde_json::json;

    fn parse(body: Value) -> crate::Result<SourceReading> {
        serde_json::from_value::<WaqiResponse>(body)
            .unwrap()
            .into_reading()
    }

    #[test]
    fn test_ok_feed_conversion() {
        let reading = parse(json!({
            "status": "ok",
            "data": {
                "aqi": 74,
                "idx": 8190,
                "city": { "geo": [12.9, 77.5], "name": "BTM Layout, Bengaluru", "distance": 2.4 },
                "iaqi": {
                    "pm25": { "v": 74 },
                    "pm10": { "v": 41 },
                    "no2": { "v": 9.6 },
                    "t": { "v": 24 }
                },
                "time": { "s": "2024-01-10 09:00:00", "tz": "+05:30", "iso": "2024-01-10T09:00:00+05:30" }
            }
        }))
        .unwrap();

        assert_eq!(reading.source, ProviderName::Waqi);
        assert_eq!(reading.aqi, 74);
        assert_eq!(reading.distance_km, 2.4);
        assert_eq!(reading.station, "BTM Layout, Bengaluru");
        assert_eq!(reading.timestamp, "2024-01-10T09:00:00+05:30");
        assert_eq!(reading.pollutants.pm25, Some(74.0));
        assert_eq!(reading.pollutants.no2, Some(9.6));
        assert_eq!(reading.pollutants.o3, None);
        assert_eq!(reading.pollutants.co, None);
    }

    #[test]
    fn test_missing_distance_defaults_to_zero() {
        let reading = parse(json!({
            "status": "ok",
            "data": {
                "aqi": 40,
                "city": { "name": "Peenya" },
                "time": { "iso": "2024-01-10T09:00:00+05:30" }
            }
        }))
        .unwrap();

        assert_eq!(reading.distance_km, 0.0);
        assert!(reading.pollutants.is_empty());
    }

    #[test]
    fn test_error_status_is_unavailable() {
        let err = parse(json!({ "status": "error", "data": "Invalid key" })).unwrap_err();
        assert!(matches!(
            err,
            AirwiseError::Provider {
                provider: ProviderName::Waqi,
                ..
            }
        ));
        assert!(err.to_string().contains("Invalid key"));
    }

    #[test]
    fn test_placeholder_aqi_is_unavailable() {
        let result = parse(json!({
            "status": "ok",
            "data": { "aqi": "-", "city": { "name": "Silent Station" } }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_pollutant_keeps_reading() {
        let reading = parse(json!({
            "status": "ok",
            "data": {
                "aqi": 74,
                "city": { "name": "Peenya, Bengaluru" },
                "iaqi": { "pm25": { "v": 74 }, "co": { "v": "-" } }
            }
        }))
        .unwrap();

        assert_eq!(reading.aqi, 74);
        assert_eq!(reading.pollutants.pm25, Some(74.0));
        assert_eq!(reading.pollutants.co, None);
    }

    #[tokio::test]
    async fn test_missing_api_key_returns_none() {
        let config = AirwiseConfig::default();
        let provider = WaqiProvider::new(Client::new(), &config.providers.waqi);
        let coord = Coordinate::new(12.9716, 77.5946).unwrap();
        assert!(provider.fetch(coord).await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_returns_none() {
        let mut config = AirwiseConfig::default();
        config.providers.waqi.api_key = Some("test-token".to_string());
        config.providers.waqi.base_url = "http://127.0.0.1:1".to_string();
        let provider = WaqiProvider::new(Client::new(), &config.providers.waqi);
        let coord = Coordinate::new(12.9716, 77.5946).unwrap();
        assert!(provider.fetch(coord).await.is_none());
    }
}
