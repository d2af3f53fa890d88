//! Forecast display state: current conditions, chart series and table.

use chrono::{DateTime, Local};
use mlcast_weather::{
    icon_for_condition, variance_insight, CurrentWeather, ForecastDay, ForecastError,
    ForecastResult, VarianceInsight,
};
use serde::Serialize;

/// Forecast table shows at most this many days.
pub const TABLE_DAY_LIMIT: usize = 5;

/// Two line series sharing the date labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub ml: Vec<Option<f64>>,
    pub api: Vec<f64>,
}

impl ChartSeries {
    pub fn from_days(days: &[ForecastDay]) -> Self {
        Self {
            labels: days.iter().map(|d| d.date.clone()).collect(),
            ml: days.iter().map(|d| d.ml_temp).collect(),
            api: days.iter().map(|d| d.api_temp).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Current conditions formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    pub temp: String,
    pub condition: String,
    pub icon: &'static str,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub high_temp: String,
    pub low_temp: String,
}

impl From<&CurrentWeather> for CurrentView {
    fn from(current: &CurrentWeather) -> Self {
        Self {
            temp: format_value(current.temp, "°C"),
            condition: current.condition.clone(),
            icon: icon_for_condition(&current.condition),
            humidity: format_value(current.humidity, "%"),
            wind_speed: format_value(current.wind_speed, " km/h"),
            pressure: format_value(current.pressure, " hPa"),
            high_temp: format_value(current.high_temp, "°C"),
            low_temp: format_value(current.low_temp, "°C"),
        }
    }
}

/// `Some(18.5)` → `"18.5°C"`, `None` → `"--"`.
pub fn format_value(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => "--".to_string(),
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ForecastDisplay {
    city_name: String,
    current: Option<CurrentView>,
    chart: ChartSeries,
    table: Vec<ForecastDay>,
    banner: Option<VarianceInsight>,
    #[serde(skip)]
    last_updated: Option<DateTime<Local>>,
    loading: bool,
    error: Option<String>,
}

impl ForecastDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a fetch for `location` as started.
    pub fn begin(&mut self, location: &str) {
        self.city_name = location.trim().to_string();
        self.loading = true;
        self.error = None;
    }

    /// Replace everything with a fresh result.
    pub fn apply(&mut self, result: &ForecastResult, now: DateTime<Local>) {
        if let Some(name) = result.location.as_deref().filter(|n| !n.is_empty()) {
            self.city_name = name.to_string();
        }
        self.current = Some(CurrentView::from(&result.current));
        self.chart = ChartSeries::from_days(&result.forecast);
        self.table = result
            .forecast
            .iter()
            .take(TABLE_DAY_LIMIT)
            .cloned()
            .collect();
        self.banner = Some(variance_insight(result.max_variance()));
        self.last_updated = Some(now);
        self.loading = false;
        self.error = None;
    }

    /// Show an inline error; previously shown data stays visible.
    pub fn fail(&mut self, error: &ForecastError) {
        self.loading = false;
        self.error = Some(error.user_message());
    }

    pub fn city_name(&self) -> &str {
        &self.city_name
    }

    pub fn current(&self) -> Option<&CurrentView> {
        self.current.as_ref()
    }

    pub fn chart(&self) -> &ChartSeries {
        &self.chart
    }

    pub fn table(&self) -> &[ForecastDay] {
        &self.table
    }

    pub fn banner(&self) -> Option<&VarianceInsight> {
        self.banner.as_ref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    /// `HH:MM` of the last successful update.
    pub fn last_updated_label(&self) -> Option<String> {
        self.last_updated.map(|t| t.format("%H:%M").to_string())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
