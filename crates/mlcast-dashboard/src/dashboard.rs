//! Dashboard state owner.
//!
//! Holds every panel, routes forecast updates and session effects into
//! them, and hands the result to a renderer.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Local};
use mlcast_core::{AppError, Config};
use mlcast_ingest::{
    ActionKind, ActionRunner, CsvIngestSession, CsvTable, SessionEffect, SessionEvent,
    SimulatedRunner, UploadStatus, UploadedFile,
};
use mlcast_weather::{ForecastClient, ForecastError};
use serde::Serialize;
use tokio::runtime::Handle;

use crate::display::ForecastDisplay;
use crate::insights::{Insight, InsightPanel, ModelStats, PerformanceMetrics};
use crate::render::DashboardRenderer;
use crate::services::{ForecastService, ForecastSource, ForecastUpdate, IngestService};

/// What the upload card shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UploadView {
    pub status: Option<UploadStatus>,
    pub preview: Option<CsvTable>,
    pub actions_visible: bool,
    /// Action currently running; both buttons are disabled while set.
    pub busy: Option<ActionKind>,
    /// File shown in the picker.
    pub file_name: Option<String>,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    forecast: &'a ForecastDisplay,
    insights: &'a InsightPanel,
    stats: &'a ModelStats,
    performance: &'a PerformanceMetrics,
    upload: &'a UploadView,
}

pub struct Dashboard<F = ForecastClient, R = SimulatedRunner> {
    display: ForecastDisplay,
    insights: InsightPanel,
    stats: ModelStats,
    performance: PerformanceMetrics,
    upload: UploadView,
    forecast: ForecastService<F>,
    ingest: IngestService<R>,
}

impl Dashboard {
    /// Build a dashboard backed by the HTTP client and simulated actions.
    ///
    /// # Errors
    /// Fails when the forecast client cannot be built from `config`.
    pub fn from_config(config: &Config, runtime: Handle) -> anyhow::Result<Self> {
        let client = ForecastClient::from_config(&config.forecast)
            .map_err(AppError::from)
            .context("Failed to create forecast client")?;
        let runner = SimulatedRunner::from_config(&config.actions);

        Ok(Self::new(
            ForecastService::new(client, runtime.clone()),
            IngestService::new(runner, config.upload.max_bytes, runtime),
        ))
    }
}

impl<F: ForecastSource, R: ActionRunner> Dashboard<F, R> {
    pub fn new(forecast: ForecastService<F>, ingest: IngestService<R>) -> Self {
        Self {
            display: ForecastDisplay::new(),
            insights: InsightPanel::new(),
            stats: ModelStats::default(),
            performance: PerformanceMetrics::default(),
            upload: UploadView::default(),
            forecast,
            ingest,
        }
    }

    pub fn display(&self) -> &ForecastDisplay {
        &self.display
    }

    pub fn insights(&self) -> &InsightPanel {
        &self.insights
    }

    pub fn stats(&self) -> &ModelStats {
        &self.stats
    }

    pub fn performance(&self) -> &PerformanceMetrics {
        &self.performance
    }

    pub fn upload(&self) -> &UploadView {
        &self.upload
    }

    pub fn session(&self) -> &CsvIngestSession {
        self.ingest.session()
    }

    /// Start a forecast search. Returns false when the input was rejected.
    pub fn search(&mut self, location: &str) -> bool {
        match self.forecast.request(location) {
            Ok(_) => {
                self.display.begin(location);
                true
            }
            Err(e) => {
                self.show_forecast_error(&e);
                false
            }
        }
    }

    /// Wait for the latest search to finish and apply it.
    pub async fn wait_forecast(&mut self) -> bool {
        match self.forecast.recv().await {
            Some(update) => {
                self.apply_forecast(update);
                true
            }
            None => false,
        }
    }

    fn apply_forecast(&mut self, update: ForecastUpdate) {
        match update.result {
            Ok(result) => {
                self.display.apply(&result, Local::now());
                if let Some(banner) = self.display.banner() {
                    self.insights.replace_primary(Insight::from(banner));
                }
            }
            Err(e) => {
                tracing::error!("Forecast for {} failed", update.location);
                self.show_forecast_error(&e);
            }
        }
    }

    fn show_forecast_error(&mut self, error: &ForecastError) {
        let app_error = AppError::from(error.clone());
        tracing::warn!("{} ({})", app_error, app_error.user_message());
        self.display.fail(error);
    }

    /// Read a CSV file from disk and preview it.
    pub async fn upload_path(&mut self, path: &Path) {
        let effects = self.ingest.load_path(path).await;
        self.apply_effects(effects);
    }

    /// Preview an already-read file.
    pub fn upload_file(&mut self, file: UploadedFile) {
        self.send(SessionEvent::FileSelected(file));
    }

    pub fn process(&mut self) {
        self.send(SessionEvent::ProcessRequested);
    }

    pub fn analyze(&mut self) {
        self.send(SessionEvent::AnalyzeRequested);
    }

    pub fn clear(&mut self) {
        self.send(SessionEvent::Clear);
    }

    /// Wait for the running process/analyze action. False when none runs.
    pub async fn wait_action(&mut self) -> bool {
        match self.ingest.next_completion().await {
            Some(effects) => {
                self.apply_effects(effects);
                true
            }
            None => false,
        }
    }

    /// Apply whatever has finished without waiting.
    pub fn poll(&mut self) {
        while let Some(update) = self.forecast.try_recv() {
            self.apply_forecast(update);
        }
        while let Some(effects) = self.ingest.try_recv() {
            self.apply_effects(effects);
        }
    }

    fn send(&mut self, event: SessionEvent) {
        let effects = self.ingest.dispatch(event);
        self.apply_effects(effects);
    }

    fn apply_effects(&mut self, effects: Vec<SessionEffect>) {
        for effect in effects {
            tracing::debug!("Applying {:?}", effect);
            match effect {
                SessionEffect::ShowStatus(status) => self.upload.status = Some(status),
                SessionEffect::ClearStatus => self.upload.status = None,
                SessionEffect::ShowPreview(table) => {
                    self.upload.preview = Some(table);
                    self.upload.file_name =
                        self.ingest.session().file().map(|f| f.name().to_string());
                    self.upload.busy = None;
                }
                SessionEffect::HidePreview => self.upload.preview = None,
                SessionEffect::ShowActions => self.upload.actions_visible = true,
                SessionEffect::HideActions => {
                    self.upload.actions_visible = false;
                    self.upload.busy = None;
                }
                SessionEffect::ResetInput => self.upload.file_name = None,
                SessionEffect::StartAction(ticket) => self.upload.busy = Some(ticket.kind),
                SessionEffect::ActionRejected(kind) => {
                    tracing::debug!("{} ignored", kind.label());
                }
                SessionEffect::ActionFinished(_) => self.upload.busy = None,
                SessionEffect::ReplaceInsight(note) => {
                    self.insights.replace_primary(Insight::from(note));
                }
                SessionEffect::AppendInsight(note) => self.insights.append(Insight::from(note)),
                SessionEffect::UpdateStats(update) => self.stats.apply(update),
            }
        }
    }

    pub fn render(&self, renderer: &mut impl DashboardRenderer) {
        self.render_at(renderer, Local::now());
    }

    /// Render with an explicit clock for the header date.
    pub fn render_at(&self, renderer: &mut impl DashboardRenderer, now: DateTime<Local>) {
        let date = now.format("%A, %B %-d, %Y").to_string();
        let updated = self.display.last_updated_label();
        renderer.draw_header(&date, self.display.city_name(), updated.as_deref());

        if let Some(error) = self.display.error() {
            renderer.draw_error(error);
        }
        if let Some(current) = self.display.current() {
            renderer.draw_current(current);
        }
        renderer.draw_forecast_chart(self.display.chart());
        renderer.draw_forecast_table(self.display.table());
        renderer.draw_insights(&self.insights.all());
        renderer.draw_stats(&self.stats, &self.performance);
        renderer.draw_upload(&self.upload);
    }

    /// Dashboard state as JSON.
    ///
    /// # Errors
    /// Propagates serialization failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Snapshot {
            forecast: &self.display,
            insights: &self.insights,
            stats: &self.stats,
            performance: &self.performance,
            upload: &self.upload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::TimeZone;
    use mlcast_ingest::{SessionPhase, StatusKind};
    use mlcast_weather::{CurrentWeather, ForecastDay, ForecastResult};

    use crate::render::TextRenderer;

    struct FixedSource;

    impl ForecastSource for FixedSource {
        async fn fetch(&self, location: &str) -> Result<ForecastResult, ForecastError> {
            if location == "Atlantis" {
                return Err(ForecastError::NotFound);
            }
            Ok(ForecastResult {
                location: Some(location.to_string()),
                current: CurrentWeather {
                    temp: Some(14.2),
                    condition: "light rain".into(),
                    ..Default::default()
                },
                forecast: vec![ForecastDay {
                    date: "2024-05-01".into(),
                    ml_temp: Some(18.0),
                    api_temp: 14.0,
                    variance_class: "high".into(),
                    variance_text: "4.0°C".into(),
                    condition: None,
                    humidity: None,
                    pressure: None,
                    wind_speed: None,
                }],
            })
        }
    }

    fn dashboard() -> Dashboard<FixedSource, SimulatedRunner> {
        let runtime = Handle::current();
        Dashboard::new(
            ForecastService::new(FixedSource, runtime.clone()),
            IngestService::new(
                SimulatedRunner::new(Duration::from_millis(2000), Duration::from_millis(2500)),
                5 * 1024 * 1024,
                runtime,
            ),
        )
    }

    fn csv() -> UploadedFile {
        UploadedFile::from_text("history.csv", "date,temp\n2024-04-01,12\n2024-04-02,13\n")
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_fills_display_and_banner() {
        let mut dash = dashboard();
        assert!(dash.search("Berlin"));
        assert!(dash.display().is_loading());
        assert!(dash.wait_forecast().await);

        assert_eq!(dash.display().city_name(), "Berlin");
        let primary = dash.insights().primary().unwrap();
        assert_eq!(primary.badge, "Alert");
        assert!(primary.message.contains("4.0°C"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_search_is_inline_error() {
        let mut dash = dashboard();
        assert!(!dash.search("  "));
        assert_eq!(dash.display().error(), Some("Please enter a location"));
        assert!(!dash.wait_forecast().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_city_is_inline_error() {
        let mut dash = dashboard();
        dash.search("Atlantis");
        dash.wait_forecast().await;
        assert_eq!(dash.display().error(), Some("City not found or API error"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_process_then_analyze() {
        let mut dash = dashboard();
        dash.upload_file(csv());
        assert!(dash.upload().actions_visible);
        assert_eq!(dash.upload().file_name.as_deref(), Some("history.csv"));

        dash.process();
        assert_eq!(dash.upload().busy, Some(ActionKind::Process));
        dash.analyze();
        assert_eq!(dash.upload().busy, Some(ActionKind::Process));

        assert!(dash.wait_action().await);
        assert_eq!(dash.upload().busy, None);
        assert_eq!(dash.stats().accuracy_label(), "89%");
        assert_eq!(dash.insights().primary().unwrap().badge, "Info");

        dash.analyze();
        assert!(dash.wait_action().await);
        assert_eq!(dash.session().phase(), SessionPhase::Analyzed);
        assert_eq!(dash.insights().len(), 2);
        assert_eq!(
            dash.upload().status.as_ref().unwrap().message,
            "Analysis complete. Historical trends identified."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_resets_upload_card() {
        let mut dash = dashboard();
        dash.upload_file(csv());
        dash.process();
        dash.clear();

        assert_eq!(dash.upload(), &UploadView::default());
        assert!(!dash.wait_action().await);
        assert_eq!(dash.stats().accuracy_label(), "87%");
    }

    #[tokio::test(start_paused = true)]
    async fn test_bad_file_keeps_previous_preview() {
        let mut dash = dashboard();
        dash.upload_file(csv());
        dash.upload_file(UploadedFile::from_text("notes.txt", "x"));

        let status = dash.upload().status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.message, "Please upload a CSV file");
        assert!(dash.upload().preview.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_text() {
        let mut dash = dashboard();
        dash.search("Berlin");
        dash.wait_forecast().await;
        dash.upload_file(csv());

        let now = Local.with_ymd_and_hms(2024, 5, 6, 9, 30, 0).unwrap();
        let mut renderer = TextRenderer::new();
        dash.render_at(&mut renderer, now);
        let out = renderer.into_string();

        assert!(out.starts_with("mlcast | Monday, May 6, 2024\nBerlin (last updated "));
        assert!(out.contains("Now: 14.2°C light rain [cloud_rain]"));
        assert!(out.contains("[Alert] Significant variance"));
        assert!(out.contains("Accuracy 87% | MAE 1.2°C"));
        assert!(out.contains("Upload [ok]: Successfully loaded CSV: history.csv"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_json_snapshot() {
        let mut dash = dashboard();
        dash.upload_file(csv());
        let json: serde_json::Value = serde_json::from_str(&dash.to_json().unwrap()).unwrap();
        assert_eq!(json["upload"]["status"]["kind"], "success");
        assert_eq!(json["stats"]["accuracy_pct"], 87.0);
    }
}
