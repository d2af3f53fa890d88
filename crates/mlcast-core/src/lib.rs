pub mod action_state;
pub mod config;
pub mod error;

pub use action_state::ActionState;
pub use config::{
    ActionsConfig, Config, ConfigIssue, ForecastConfig, Severity, UploadConfig, ValidationReport,
};
pub use error::{AppError, ConfigError, ForecastError, NetworkError, ReqwestErrorExt, UploadError};

use anyhow::Result;

/// Initialize logging for the dashboard.
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    tracing::info!("mlcast core initialized");
    Ok(())
}
