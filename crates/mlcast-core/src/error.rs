//! Shared error taxonomy.
//!
//! Variants keep the detail for logs; `user_message()` is the short line the
//! dashboard shows inline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Inline message for the dashboard.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Upload(e) => e.user_message(),
            AppError::Forecast(e) => e.user_message(),
            AppError::Io(_) => "Could not access the file.",
            AppError::Other(_) => "Something went wrong.",
        }
    }
}

/// Transport-level failures talking to the forecast backend.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Backend unreachable: {0}")]
    ConnectionFailed(String),

    #[error("Backend did not answer in time")]
    Timeout,

    #[error("Backend returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Unreadable backend response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => "Error fetching weather data: backend unreachable",
            NetworkError::Timeout => "Error fetching weather data: request timed out",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "Forecast backend is having trouble. Try again later."
            }
            NetworkError::ServerError { .. } => "City not found or API error",
            NetworkError::InvalidResponse(_) => "Error fetching weather data: unexpected response",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Malformed config file: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Forecast settings are invalid. Check config.toml.",
            ConfigError::ParseError(_) => "config.toml could not be parsed.",
        }
    }
}

/// CSV upload failures.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Rejected upload: {0}")]
    Rejected(String),

    #[error("Unusable CSV: {0}")]
    ParseFailed(String),

    #[error("Could not read upload: {0}")]
    ReadFailed(String),
}

impl UploadError {
    pub fn user_message(&self) -> &'static str {
        match self {
            UploadError::Rejected(_) => "Please upload a CSV file within the size limit",
            UploadError::ParseFailed(_) => "No data found in CSV file",
            UploadError::ReadFailed(_) => "Error reading file",
        }
    }
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Empty location")]
    LocationRequired,

    #[error("No forecast for {0}")]
    LocationNotFound(String),
}

impl ForecastError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ForecastError::LocationRequired => "Please enter a location",
            ForecastError::LocationNotFound(_) => "City not found or API error",
        }
    }
}

/// Classify a reqwest failure.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            return NetworkError::Timeout;
        }
        if self.is_decode() {
            return NetworkError::InvalidResponse(self.to_string());
        }
        match self.status() {
            Some(status) => NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            },
            None => NetworkError::ConnectionFailed(self.to_string()),
        }
    }
}
