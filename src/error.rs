//! Error types and handling for the `Airwise` service

use thiserror::Error;

use crate::models::ProviderName;

/// Main error type for the `Airwise` service
#[derive(Error, Debug)]
pub enum AirwiseError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A single provider could not deliver a reading
    #[error("{provider} unavailable: {message}")]
    Provider {
        provider: ProviderName,
        message: String,
    },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Every provider task failed before settling
    #[error("No result: all air quality providers failed unexpectedly")]
    NoResult,

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl AirwiseError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(provider: ProviderName, message: S) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Message shown to API clients. Only request errors and the engine
    /// sentinel get wording of their own.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AirwiseError::Validation { message } => message.clone(),
            AirwiseError::NoResult => "Unable to fetch AQI data for this location".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for AirwiseError {
    fn from(err: reqwest::Error) -> Self {
        Self::general(format!("HTTP client error: {err}"))
    }
}
