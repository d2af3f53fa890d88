//! Forecast client error types.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForecastError {
    /// Location was empty or whitespace. Raised before any request is made.
    #[error("Please enter a location")]
    InvalidInput,

    /// Backend answered with a non-success status.
    #[error("City not found or API error")]
    NotFound,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid forecast response: {0}")]
    InvalidResponse(String),

    #[error("Invalid forecast endpoint: {0}")]
    Config(String),
}

impl ForecastError {
    /// User-friendly error message for inline display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput => "Please enter a location".to_string(),
            Self::NotFound => "City not found or API error".to_string(),
            Self::NetworkError(msg) => format!("Error fetching weather data: {}", msg),
            Self::InvalidResponse(_) => {
                "Error fetching weather data: unexpected response".to_string()
            }
            Self::Config(_) => "Forecast service is misconfigured. Check settings.".to_string(),
        }
    }
}
