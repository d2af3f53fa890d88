use mlcast_core::{AppError, ConfigError, ForecastError as CoreForecastError, NetworkError};
use mlcast_weather::ForecastError;

impl From<ForecastError> for AppError {
    fn from(e: ForecastError) -> Self {
        match e {
            ForecastError::InvalidInput => AppError::Forecast(CoreForecastError::LocationRequired),
            ForecastError::NotFound => {
                AppError::Forecast(CoreForecastError::LocationNotFound(e.to_string()))
            }
            ForecastError::NetworkError(s) => AppError::Network(NetworkError::ConnectionFailed(s)),
            ForecastError::InvalidResponse(s) => {
                AppError::Network(NetworkError::InvalidResponse(s))
            }
            ForecastError::Config(s) => AppError::Config(ConfigError::Invalid(s)),
        }
    }
}
