#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use airwise::models::{Pollutants, ProviderName, SourceReading};
use airwise::{AirQualityProvider, Coordinate};
use async_trait::async_trait;
use axum::Router;
use axum::http::{StatusCode, Uri};
use axum::response::Json;
use serde_json::Value;

pub fn bengaluru() -> Coordinate {
    Coordinate::new(12.9716, 77.5946).unwrap()
}

/// Provider returning a fixed AQI at a fixed station distance
pub struct FakeProvider {
    name: ProviderName,
    aqi: Option<u32>,
    distance_km: f64,
}

impl FakeProvider {
    pub fn new(name: ProviderName, aqi: u32, distance_km: f64) -> Self {
        Self {
            name,
            aqi: Some(aqi),
            distance_km,
        }
    }

    pub fn unavailable(name: ProviderName) -> Self {
        Self {
            name,
            aqi: None,
            distance_km: 0.0,
        }
    }

    pub fn shared(self) -> Arc<dyn AirQualityProvider> {
        Arc::new(self)
    }
}

#[async_trait]
impl AirQualityProvider for FakeProvider {
    fn name(&self) -> ProviderName {
        self.name
    }

    async fn fetch(&self, _coord: Coordinate) -> Option<SourceReading> {
        self.aqi.map(|aqi| SourceReading {
            source: self.name,
            aqi,
            distance_km: self.distance_km,
            station: format!("{} test station", self.name),
            timestamp: "2024-01-10T09:00:00+05:30".to_string(),
            pollutants: Pollutants {
                pm25: Some(f64::from(aqi)),
                ..Pollutants::default()
            },
        })
    }
}

pub struct CrashingProvider(pub ProviderName);

#[async_trait]
impl AirQualityProvider for CrashingProvider {
    fn name(&self) -> ProviderName {
        self.0
    }

    async fn fetch(&self, _coord: Coordinate) -> Option<SourceReading> {
        panic!("{} adapter crashed", self.0);
    }
}

/// Local HTTP server answering every request with one canned response
pub struct Fixture {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Fixture {
    pub async fn serve(status: StatusCode, body: Value) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        let app = Router::new().fallback(move |uri: Uri| {
            let log = Arc::clone(&log);
            let body = body.clone();
            async move {
                log.lock().unwrap().push(uri.to_string());
                (status, Json(body))
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}
