//! Air quality provider adapters
//!
//! Each adapter fetches raw data for a coordinate from one third-party
//! provider and normalizes it into a [`SourceReading`]. Adapters never fail:
//! network, HTTP, decode and provider-status errors are logged and reported
//! as an unavailable reading (`None`).

pub mod iqair;
pub mod waqi;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::config::{AirwiseConfig, HttpConfig};
use crate::error::AirwiseError;
use crate::models::{Coordinate, ProviderName, SourceReading};

pub use iqair::IqAirProvider;
pub use waqi::WaqiProvider;

#[async_trait]
pub trait AirQualityProvider: Send + Sync {
    fn name(&self) -> ProviderName;

    /// Fetch a normalized reading, or `None` when the provider is unavailable
    async fn fetch(&self, coord: Coordinate) -> Option<SourceReading>;
}

/// Shared HTTP client for all adapters
pub fn http_client(config: &HttpConfig) -> crate::Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// Build all adapters in their fixed invocation order
pub fn build_providers(config: &AirwiseConfig) -> crate::Result<Vec<Arc<dyn AirQualityProvider>>> {
    let client = http_client(&config.http)?;

    let waqi: Arc<dyn AirQualityProvider> =
        Arc::new(WaqiProvider::new(client.clone(), &config.providers.waqi));
    let iqair: Arc<dyn AirQualityProvider> =
        Arc::new(IqAirProvider::new(client, &config.providers.iqair));

    Ok(vec![waqi, iqair])
}

/// Turn a non-success HTTP status into a provider error
fn check_status(provider: ProviderName, response: &Response) -> crate::Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let message = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("HTTP {status}: invalid or missing API key")
        }
        StatusCode::TOO_MANY_REQUESTS => format!("HTTP {status}: rate limit exceeded"),
        _ => format!("HTTP {status}"),
    };
    Err(AirwiseError::provider(provider, message))
}

/// Providers report AQI as a number, but use placeholders such as "-" when
/// a station has no current value.
fn parse_aqi(value: &Value) -> Option<u32> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    Some(raw)
        .filter(|v| (0.0..=f64::from(u32::MAX)).contains(v))
        .map(|v| v.round() as u32)
}

/// Numeric pollutant value; anything else counts as not reported
fn parse_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}
