//! Dashboard state for the ML forecast demo.
//!
//! Owns the forecast display, insight panel and upload card, runs forecast
//! fetches and CSV actions on tokio, and renders through [`DashboardRenderer`].

pub mod dashboard;
pub mod display;
mod error_mapping;
pub mod insights;
pub mod render;
pub mod services;

pub use dashboard::{Dashboard, UploadView};
pub use display::{ChartSeries, CurrentView, ForecastDisplay, TABLE_DAY_LIMIT};
pub use insights::{Insight, InsightPanel, ModelStats, PerformanceMetrics};
pub use render::{DashboardRenderer, TextRenderer};
pub use services::{ForecastService, ForecastSource, ForecastUpdate, IngestService};
