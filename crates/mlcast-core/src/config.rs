//! `config.toml` for the dashboard: backend location, upload limit and
//! simulated action latencies.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Default upload size limit (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const CONFIG_DIR_NAME: &str = "mlcast";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Timeouts above this still work but are probably a typo.
const LONG_TIMEOUT_SECS: u64 = 120;
const LONG_LATENCY_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Startup is refused.
    Error,
    /// Logged; the value is used as is.
    Warning,
}

/// One problem found in a loaded config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    issues: Vec<ConfigIssue>,
}

impl ValidationReport {
    fn push(&mut self, severity: Severity, field: &'static str, message: impl Into<String>) {
        self.issues.push(ConfigIssue {
            severity,
            field,
            message: message.into(),
        });
    }

    fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.push(Severity::Error, field, message);
    }

    fn warn(&mut self, field: &'static str, message: impl Into<String>) {
        self.push(Severity::Warning, field, message);
    }

    pub fn errors(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Warnings alone do not make a config invalid.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// All errors on one line, `field: message; field: message`.
    pub fn error_summary(&self) -> String {
        self.errors()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `config.toml`
    pub config_dir: PathBuf,

    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub actions: ActionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Base URL of the ML forecast backend
    pub api_base_url: String,
    pub timeout_secs: u64,
    /// Searched once at startup; blank skips the startup search
    pub default_location: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            api_base_url: std::env::var("MLCAST_API_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            timeout_secs: 10,
            default_location: "London".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted CSV file in bytes
    pub max_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Latencies of the simulated process/analyze backend, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    pub process_latency_ms: u64,
    pub analyze_latency_ms: u64,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            process_latency_ms: 2000,
            analyze_latency_ms: 2500,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(CONFIG_DIR_NAME),
            forecast: ForecastConfig::default(),
            upload: UploadConfig::default(),
            actions: ActionsConfig::default(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the user config directory.
    ///
    /// # Errors
    /// Fails when the file cannot be read, parsed or first written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`. A missing file is created with defaults.
    ///
    /// # Errors
    /// Fails on I/O errors or malformed TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut config = Self::default();
            if let Some(dir) = path.parent() {
                config.config_dir = dir.to_path_buf();
            }
            config.write_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// [`Config::load`], then refuse to start on validation errors.
    /// Warnings are logged and returned.
    ///
    /// # Errors
    /// Fails when loading fails or [`Config::validate`] reports an error.
    pub fn load_validated() -> Result<(Self, ValidationReport)> {
        let config = Self::load()?;
        let report = config.validate();

        if !report.is_valid() {
            return Err(ConfigError::Invalid(report.error_summary()))
                .context("Configuration validation failed");
        }
        for warning in report.warnings() {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, report))
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        let forecast = &self.forecast;

        if let Err(message) = check_backend_url(&forecast.api_base_url) {
            report.error("forecast.api_base_url", message);
        }

        match forecast.timeout_secs {
            0 => report.error("forecast.timeout_secs", "Timeout must be greater than 0"),
            t if t > LONG_TIMEOUT_SECS => report.warn(
                "forecast.timeout_secs",
                format!("Timeout of {}s is unusually long", t),
            ),
            _ => {}
        }

        if forecast.default_location.trim().is_empty() {
            report.warn(
                "forecast.default_location",
                "No default location, startup forecast will be skipped",
            );
        }

        match self.upload.max_bytes {
            0 => report.error("upload.max_bytes", "Upload limit must be greater than 0"),
            b if b > DEFAULT_MAX_UPLOAD_BYTES => report.warn(
                "upload.max_bytes",
                "Upload limit above 5 MiB; previews only ever read 5 rows",
            ),
            _ => {}
        }

        for (field, latency) in [
            ("actions.process_latency_ms", self.actions.process_latency_ms),
            ("actions.analyze_latency_ms", self.actions.analyze_latency_ms),
        ] {
            if latency > LONG_LATENCY_MS {
                report.warn(field, "Latency is more than a minute");
            }
        }

        report
    }

    /// Write to the user config directory.
    ///
    /// # Errors
    /// Fails when the directory or file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.write_to(&Self::default_path()?)
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let text = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("No user config directory")?;
        Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }
}

/// The backend must be an absolute http(s) URL with a host.
fn check_backend_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("Invalid URL: {}", e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!(
            "URL must use http or https scheme, got: {}",
            url.scheme()
        ));
    }
    if url.host().is_none() {
        return Err("URL must have a host".to_string());
    }
    if url.port() == Some(0) {
        return Err("Port cannot be 0".to_string());
    }
    Ok(())
}
