//! Insight banners and model statistics.

use mlcast_ingest::{InsightNote, StatsUpdate};
use mlcast_weather::{VarianceInsight, VarianceLevel};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub level: VarianceLevel,
    pub badge: String,
    pub message: String,
}

impl From<&VarianceInsight> for Insight {
    fn from(v: &VarianceInsight) -> Self {
        Self {
            level: v.level,
            badge: v.badge().to_string(),
            message: v.message.clone(),
        }
    }
}

impl From<InsightNote> for Insight {
    fn from(note: InsightNote) -> Self {
        Self {
            level: VarianceLevel::Low,
            badge: note.badge,
            message: note.message,
        }
    }
}

/// The primary banner plus any appended analysis notes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InsightPanel {
    primary: Option<Insight>,
    appended: Vec<Insight>,
}

impl InsightPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_primary(&mut self, insight: Insight) {
        self.primary = Some(insight);
    }

    pub fn append(&mut self, insight: Insight) {
        self.appended.push(insight);
    }

    pub fn primary(&self) -> Option<&Insight> {
        self.primary.as_ref()
    }

    /// All insights in display order, primary first.
    pub fn all(&self) -> Vec<&Insight> {
        self.primary.iter().chain(self.appended.iter()).collect()
    }

    pub fn len(&self) -> usize {
        usize::from(self.primary.is_some()) + self.appended.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Headline stat tiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelStats {
    pub accuracy_pct: f64,
    pub mae_celsius: f64,
}

impl Default for ModelStats {
    fn default() -> Self {
        Self {
            accuracy_pct: 87.0,
            mae_celsius: 1.2,
        }
    }
}

impl ModelStats {
    pub fn apply(&mut self, update: StatsUpdate) {
        self.accuracy_pct = update.accuracy_pct;
        self.mae_celsius = update.mae_celsius;
    }

    pub fn accuracy_label(&self) -> String {
        format!("{}%", self.accuracy_pct)
    }

    pub fn mae_label(&self) -> String {
        format!("{}°C", self.mae_celsius)
    }
}

/// Static model performance bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub accuracy_pct: f64,
    pub mae_celsius: f64,
    pub rmse_celsius: f64,
    pub r2_pct: f64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            accuracy_pct: 87.0,
            mae_celsius: 1.2,
            rmse_celsius: 1.8,
            r2_pct: 92.0,
        }
    }
}

impl PerformanceMetrics {
    /// `(label, value, unit)` per bar, in chart order.
    pub fn bars(&self) -> [(&'static str, f64, &'static str); 4] {
        [
            ("Accuracy", self.accuracy_pct, "%"),
            ("MAE", self.mae_celsius, "°C"),
            ("RMSE", self.rmse_celsius, "°C"),
            ("R²", self.r2_pct, "%"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlcast_weather::variance_insight;

    #[test]
    fn replace_keeps_appended() {
        let mut panel = InsightPanel::new();
        panel.replace_primary(Insight::from(&variance_insight(4.0)));
        panel.append(Insight::from(InsightNote {
            badge: "CSV Analysis".into(),
            message: "m".into(),
        }));
        panel.replace_primary(Insight::from(InsightNote {
            badge: "Info".into(),
            message: "CSV data integrated.".into(),
        }));

        assert_eq!(panel.len(), 2);
        assert_eq!(panel.primary().unwrap().badge, "Info");
        assert_eq!(panel.all()[1].badge, "CSV Analysis");
    }

    #[test]
    fn stats_update_labels() {
        let mut stats = ModelStats::default();
        assert_eq!(stats.accuracy_label(), "87%");
        stats.apply(StatsUpdate {
            accuracy_pct: 89.0,
            mae_celsius: 1.1,
        });
        assert_eq!(stats.accuracy_label(), "89%");
        assert_eq!(stats.mae_label(), "1.1°C");
    }

    #[test]
    fn performance_bars_in_order() {
        let labels: Vec<&str> = PerformanceMetrics::default()
            .bars()
            .iter()
            .map(|(label, _, _)| *label)
            .collect();
        assert_eq!(labels, vec!["Accuracy", "MAE", "RMSE", "R²"]);
    }
}
