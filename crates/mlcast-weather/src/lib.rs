//! Forecast backend client for the dashboard.
//!
//! Fetches paired ML and API temperature forecasts for a location and
//! derives the variance classification used by the insight banner.

pub mod client;
pub mod condition;
pub mod error;
pub mod types;
pub mod variance;

pub use client::ForecastClient;
pub use condition::{icon_for_condition, WeatherCondition};
pub use error::ForecastError;
pub use types::*;
pub use variance::{classify, format_variance, max_variance, variance_insight, VarianceInsight, VarianceLevel};
