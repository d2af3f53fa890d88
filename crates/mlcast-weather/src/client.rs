//! ML forecast backend client.

use std::time::Duration;

use mlcast_core::{ForecastConfig, NetworkError, ReqwestErrorExt};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use crate::error::ForecastError;
use crate::types::{ApiForecastResponse, ForecastResult};

const FORECAST_PATH: &str = "weather/ml_whether/";
const USER_AGENT: &str = "mlcast/0.1.0";

#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    endpoint: Url,
}

impl ForecastClient {
    /// # Errors
    /// `Config` when the base URL does not parse or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ForecastError> {
        let endpoint = Url::parse(&format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            FORECAST_PATH
        ))
        .map_err(|e| ForecastError::Config(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ForecastError::Config(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    /// # Errors
    /// See [`ForecastClient::new`].
    pub fn from_config(config: &ForecastConfig) -> Result<Self, ForecastError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Request URL for a location, with the location query-encoded.
    pub fn forecast_url(&self, location: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("location", location);
        url
    }

    /// Fetch current conditions and the daily forecast for a location.
    ///
    /// # Errors
    /// `InvalidInput` for a blank location (no request is sent), `NotFound`
    /// for any non-success status, `NetworkError` when the request fails in
    /// transport, `InvalidResponse` when the body cannot be decoded.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(&self, location: &str) -> Result<ForecastResult, ForecastError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(ForecastError::InvalidInput);
        }

        let url = self.forecast_url(location);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Forecast backend returned status {}", status);
            return Err(ForecastError::NotFound);
        }

        let body: ApiForecastResponse = response.json().await.map_err(transport_error)?;
        let result = ForecastResult::from(body);

        tracing::info!(
            "Fetched {} forecast days for {}",
            result.forecast.len(),
            result.location.as_deref().unwrap_or(location)
        );
        Ok(result)
    }
}

fn transport_error(error: reqwest::Error) -> ForecastError {
    match error.into_network_error() {
        NetworkError::InvalidResponse(msg) => ForecastError::InvalidResponse(msg),
        other => ForecastError::NetworkError(other.to_string()),
    }
}
