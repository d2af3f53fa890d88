use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use mlcast_core::Config;
use mlcast_dashboard::{Dashboard, TextRenderer};
use tokio::runtime::Handle;

#[derive(Parser, Debug)]
#[command(name = "mlcast")]
#[command(about = "Compare ML and API weather forecasts, and preview CSV history")]
#[command(version)]
pub struct Cli {
    /// Print the dashboard as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// City to forecast; defaults to forecast.default_location
    pub location: Option<String>,

    /// CSV file to upload, process and analyze
    pub csv_path: Option<PathBuf>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let (config, _validation) = Config::load_validated()?;
        let location = self
            .location
            .unwrap_or_else(|| config.forecast.default_location.clone());

        tracing::info!(
            "mlcast started (backend {})",
            config.forecast.api_base_url
        );

        let mut dashboard = Dashboard::from_config(&config, Handle::current())?;

        if dashboard.search(&location) {
            dashboard.wait_forecast().await;
        }

        if let Some(path) = self.csv_path {
            dashboard.upload_path(&path).await;
            if dashboard.upload().preview.is_some() {
                dashboard.process();
                dashboard.wait_action().await;
                dashboard.analyze();
                dashboard.wait_action().await;
            }
        }

        if self.json {
            println!("{}", dashboard.to_json()?);
        } else {
            let mut renderer = TextRenderer::new();
            dashboard.render(&mut renderer);
            print!("{}", renderer.into_string());
        }

        Ok(())
    }
}
