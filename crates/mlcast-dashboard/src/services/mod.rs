pub mod forecast_service;
pub mod ingest_service;

pub use forecast_service::{ForecastService, ForecastSource, ForecastUpdate};
pub use ingest_service::IngestService;
