//! ML vs API forecast variance.

use serde::Serialize;

use crate::types::ForecastDay;

/// Severity of the largest ML/API disagreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceLevel {
    Low,
    Medium,
    High,
}

impl VarianceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Badge text shown beside the insight banner.
    pub fn badge(self) -> &'static str {
        match self {
            Self::Low => "Info",
            Self::Medium => "Notice",
            Self::High => "Alert",
        }
    }
}

/// `> 3` is high, `(2, 3]` is medium, everything else is low.
pub fn classify(max_variance: f64) -> VarianceLevel {
    if max_variance > 3.0 {
        VarianceLevel::High
    } else if max_variance > 2.0 {
        VarianceLevel::Medium
    } else {
        VarianceLevel::Low
    }
}

/// Degrees with one decimal, widened when rounding would cross a
/// classification threshold: `3.04` renders as `"3.04"`, not `"3.0"`.
pub fn format_variance(value: f64) -> String {
    let level = classify(value);
    for precision in 1..=3 {
        let text = format!("{:.*}", precision, value);
        if text.parse::<f64>().map(classify) == Ok(level) {
            return text;
        }
    }
    value.to_string()
}

/// Largest |ml - api| over the days; `0.0` when no day has an ML value.
pub fn max_variance(days: &[ForecastDay]) -> f64 {
    days.iter()
        .filter_map(ForecastDay::variance)
        .fold(0.0, f64::max)
}

/// Banner derived from the maximum variance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceInsight {
    pub level: VarianceLevel,
    pub max_variance: f64,
    pub message: String,
}

impl VarianceInsight {
    pub fn badge(&self) -> &'static str {
        self.level.badge()
    }
}

pub fn variance_insight(max_variance: f64) -> VarianceInsight {
    let level = classify(max_variance);
    let message = match level {
        VarianceLevel::High => format!(
            "Significant variance (up to {}°C) between ML and API forecasts",
            format_variance(max_variance)
        ),
        VarianceLevel::Medium => format!(
            "Moderate variance (up to {}°C) between forecasts",
            format_variance(max_variance)
        ),
        VarianceLevel::Low => "Minimal variance between forecasts".to_string(),
    };

    VarianceInsight {
        level,
        max_variance,
        message,
    }
}
