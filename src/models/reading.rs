//! Provider readings and the shared pollutant set

use std::fmt;

use serde::{Deserialize, Serialize};

/// Air quality data providers known to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderName {
    #[serde(rename = "WAQI")]
    Waqi,
    #[serde(rename = "IQAir")]
    IqAir,
}

impl ProviderName {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderName::Waqi => "WAQI",
            ProviderName::IqAir => "IQAir",
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pollutant concentrations keyed by the shared pollutant set.
/// `None` means the provider did not report a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pollutants {
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub o3: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
}

impl Pollutants {
    /// Fill every missing value from `other`; present values are never overwritten.
    pub fn fill_missing_from(&mut self, other: &Pollutants) {
        self.pm25 = self.pm25.or(other.pm25);
        self.pm10 = self.pm10.or(other.pm10);
        self.o3 = self.o3.or(other.o3);
        self.no2 = self.no2.or(other.no2);
        self.so2 = self.so2.or(other.so2);
        self.co = self.co.or(other.co);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Pollutants::default()
    }
}

/// A normalized reading produced by one provider adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReading {
    pub source: ProviderName,
    /// Provider-reported composite AQI
    pub aqi: u32,
    /// Distance from the query point to the reporting station, 0 if unknown
    pub distance_km: f64,
    /// Station or city label
    pub station: String,
    /// Reading time claimed by the provider (ISO-8601)
    pub timestamp: String,
    pub pollutants: Pollutants,
}
