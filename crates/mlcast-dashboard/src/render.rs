//! Rendering seam. A renderer receives dashboard state section by section.

use mlcast_weather::ForecastDay;

use crate::dashboard::UploadView;
use crate::display::{format_value, ChartSeries, CurrentView};
use crate::insights::{Insight, ModelStats, PerformanceMetrics};

pub trait DashboardRenderer {
    fn draw_header(&mut self, date: &str, city: &str, last_updated: Option<&str>);
    fn draw_current(&mut self, current: &CurrentView);
    fn draw_forecast_chart(&mut self, chart: &ChartSeries);
    fn draw_forecast_table(&mut self, days: &[ForecastDay]);
    fn draw_insights(&mut self, insights: &[&Insight]);
    fn draw_stats(&mut self, stats: &ModelStats, performance: &PerformanceMetrics);
    fn draw_upload(&mut self, upload: &UploadView);
    fn draw_error(&mut self, message: &str);
}

/// Plain-text renderer.
#[derive(Debug, Default)]
pub struct TextRenderer {
    out: String,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }
}

impl DashboardRenderer for TextRenderer {
    fn draw_header(&mut self, date: &str, city: &str, last_updated: Option<&str>) {
        self.line(format!("mlcast | {}", date));
        let city = if city.is_empty() { "--" } else { city };
        match last_updated {
            Some(time) => self.line(format!("{} (last updated {})", city, time)),
            None => self.line(city),
        }
    }

    fn draw_current(&mut self, current: &CurrentView) {
        self.line(format!(
            "Now: {} {} [{}]",
            current.temp, current.condition, current.icon
        ));
        self.line(format!(
            "  Humidity {} | Wind {} | Pressure {} | High {} | Low {}",
            current.humidity,
            current.wind_speed,
            current.pressure,
            current.high_temp,
            current.low_temp
        ));
    }

    fn draw_forecast_chart(&mut self, chart: &ChartSeries) {
        if chart.is_empty() {
            return;
        }
        self.line("Chart (ML / API):");
        for ((label, ml), api) in chart.labels.iter().zip(&chart.ml).zip(&chart.api) {
            self.line(format!(
                "  {:<12} {:>8} {:>8}",
                label,
                format_value(*ml, "°C"),
                format_value(Some(*api), "°C")
            ));
        }
    }

    fn draw_forecast_table(&mut self, days: &[ForecastDay]) {
        if days.is_empty() {
            return;
        }
        self.line(format!(
            "  {:<12} {:>8} {:>8}  {}",
            "Date", "ML", "API", "Variance"
        ));
        for day in days {
            let ml = day
                .ml_temp
                .map_or_else(|| "N/A".to_string(), |t| format!("{:.1}°C", t));
            let api = format!("{:.1}°C", day.api_temp);
            self.line(format!(
                "  {:<12} {:>8} {:>8}  {} ({})",
                day.date, ml, api, day.variance_text, day.variance_class
            ));
        }
    }

    fn draw_insights(&mut self, insights: &[&Insight]) {
        for insight in insights {
            self.line(format!("[{}] {}", insight.badge, insight.message));
        }
    }

    fn draw_stats(&mut self, stats: &ModelStats, performance: &PerformanceMetrics) {
        self.line(format!(
            "Accuracy {} | MAE {}",
            stats.accuracy_label(),
            stats.mae_label()
        ));
        let bars: Vec<String> = performance
            .bars()
            .iter()
            .map(|(label, value, unit)| format!("{} {}{}", label, value, unit))
            .collect();
        self.line(format!("Model: {}", bars.join(" | ")));
    }

    fn draw_upload(&mut self, upload: &UploadView) {
        if let Some(status) = &upload.status {
            let marker = if status.is_error() { "error" } else { "ok" };
            self.line(format!("Upload [{}]: {}", marker, status.message));
        }
        if let Some(table) = &upload.preview {
            self.line(format!("  {}", table.headers.join(" | ")));
            for row in &table.rows {
                self.line(format!("  {}", row.join(" | ")));
            }
        }
        if upload.actions_visible {
            let state = match upload.busy {
                Some(kind) => format!("{} running", kind.label()),
                None => "ready".to_string(),
            };
            self.line(format!("  Actions: process, analyze ({})", state));
        }
    }

    fn draw_error(&mut self, message: &str) {
        self.line(format!("! {}", message));
    }
}
