//! Fake providers shared by unit tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::models::{Coordinate, Pollutants, ProviderName, SourceReading};
use crate::providers::AirQualityProvider;

pub fn reading(source: ProviderName, aqi: u32, distance_km: f64) -> SourceReading {
    SourceReading {
        source,
        aqi,
        distance_km,
        station: format!("{source} station"),
        timestamp: "2024-01-10T09:00:00+05:30".to_string(),
        pollutants: Pollutants::default(),
    }
}

/// Returns the same reading for every coordinate
pub struct StaticProvider {
    name: ProviderName,
    reading: Option<SourceReading>,
    delay: Duration,
}

impl StaticProvider {
    pub fn new(reading: SourceReading) -> Self {
        Self {
            name: reading.source,
            reading: Some(reading),
            delay: Duration::ZERO,
        }
    }

    pub fn unavailable(name: ProviderName) -> Self {
        Self {
            name,
            reading: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl AirQualityProvider for StaticProvider {
    fn name(&self) -> ProviderName {
        self.name
    }

    async fn fetch(&self, _coord: Coordinate) -> Option<SourceReading> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reading.clone()
    }
}

pub struct PanickingProvider(pub ProviderName);

#[async_trait]
impl AirQualityProvider for PanickingProvider {
    fn name(&self) -> ProviderName {
        self.0
    }

    async fn fetch(&self, _coord: Coordinate) -> Option<SourceReading> {
        panic!("{} adapter blew up", self.0);
    }
}

type AqiFn = dyn Fn(Coordinate) -> Option<u32> + Send + Sync;

/// Computes the AQI from the queried coordinate and records every call
pub struct CoordinateProvider {
    name: ProviderName,
    aqi: Box<AqiFn>,
    calls: Arc<Mutex<Vec<Coordinate>>>,
}

impl CoordinateProvider {
    pub fn new(
        name: ProviderName,
        aqi: impl Fn(Coordinate) -> Option<u32> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            aqi: Box::new(aqi),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<Coordinate>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl AirQualityProvider for CoordinateProvider {
    fn name(&self) -> ProviderName {
        self.name
    }

    async fn fetch(&self, coord: Coordinate) -> Option<SourceReading> {
        self.calls.lock().unwrap().push(coord);
        (self.aqi)(coord).map(|aqi| reading(self.name, aqi, 0.0))
    }
}
