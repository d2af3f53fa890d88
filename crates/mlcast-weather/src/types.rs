use serde::{Deserialize, Serialize};

use crate::condition::WeatherCondition;
use crate::variance::{classify, format_variance, max_variance, VarianceLevel};

/// Current conditions as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    /// API-reported temperature. The backend may send it as `apiTemp`.
    #[serde(default, alias = "apiTemp")]
    pub temp: Option<f64>,
    #[serde(default)]
    pub ml_temp: Option<f64>,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub high_temp: Option<f64>,
    #[serde(default)]
    pub low_temp: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl CurrentWeather {
    pub fn weather_condition(&self) -> WeatherCondition {
        WeatherCondition::from_description(&self.condition)
    }
}

/// One forecast day as it arrives on the wire
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiForecastDay {
    date: String,
    #[serde(default)]
    ml_temp: Option<f64>,
    api_temp: f64,
    #[serde(default)]
    variance_class: Option<String>,
    #[serde(default)]
    variance_text: Option<String>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    humidity: Option<f64>,
    #[serde(default)]
    pressure: Option<f64>,
    #[serde(default)]
    wind_speed: Option<f64>,
}

/// Forecast response body
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiForecastResponse {
    #[serde(default)]
    location: Option<String>,
    current: CurrentWeather,
    #[serde(default)]
    forecast: Vec<ApiForecastDay>,
}

/// One day of paired ML and API forecasts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: String,
    /// `None` when the backend model could not produce a prediction.
    pub ml_temp: Option<f64>,
    pub api_temp: f64,
    pub variance_class: String,
    pub variance_text: String,
    pub condition: Option<String>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl ForecastDay {
    /// Absolute ML/API difference, if the ML value is present.
    pub fn variance(&self) -> Option<f64> {
        self.ml_temp.map(|ml| (ml - self.api_temp).abs())
    }
}

impl From<ApiForecastDay> for ForecastDay {
    fn from(api: ApiForecastDay) -> Self {
        let variance = api.ml_temp.map(|ml| (ml - api.api_temp).abs());

        let variance_class = api.variance_class.unwrap_or_else(|| match variance {
            Some(v) => classify(v).as_str().to_string(),
            None => "none".to_string(),
        });
        let variance_text = api.variance_text.unwrap_or_else(|| match variance {
            Some(v) => format!("{}°C", format_variance(v)),
            None => "N/A".to_string(),
        });

        Self {
            date: api.date,
            ml_temp: api.ml_temp,
            api_temp: api.api_temp,
            variance_class,
            variance_text,
            condition: api.condition,
            humidity: api.humidity,
            pressure: api.pressure,
            wind_speed: api.wind_speed,
        }
    }
}

/// Complete forecast bundle for one location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Location name as resolved by the backend, if it sent one.
    pub location: Option<String>,
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
}

impl ForecastResult {
    pub fn max_variance(&self) -> f64 {
        max_variance(&self.forecast)
    }

    pub fn variance_level(&self) -> VarianceLevel {
        classify(self.max_variance())
    }
}

impl From<ApiForecastResponse> for ForecastResult {
    fn from(api: ApiForecastResponse) -> Self {
        Self {
            location: api.location,
            current: api.current,
            forecast: api.forecast.into_iter().map(ForecastDay::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> ForecastResult {
        let api: ApiForecastResponse = serde_json::from_value(json).unwrap();
        ForecastResult::from(api)
    }

    #[test]
    fn test_dashboard_shape() {
        let result = parse(serde_json::json!({
            "current": {
                "temp": 18.5, "condition": "light rain", "humidity": 72,
                "windSpeed": 4.1, "pressure": 1012, "highTemp": 20.0, "lowTemp": 11.0
            },
            "forecast": [
                {"date": "2024-05-01", "mlTemp": 17.0, "apiTemp": 18.0,
                 "varianceClass": "low", "varianceText": "1.0°C"}
            ]
        }));

        assert_eq!(result.current.temp, Some(18.5));
        assert_eq!(result.current.humidity, Some(72.0));
        assert_eq!(result.current.weather_condition(), WeatherCondition::Rain);
        assert_eq!(result.forecast[0].variance_class, "low");
        assert_eq!(result.forecast[0].variance(), Some(1.0));
    }

    #[test]
    fn test_backend_shape_fills_derived_fields() {
        let result = parse(serde_json::json!({
            "location": "London",
            "current": {"apiTemp": 12.3, "mlTemp": null, "condition": "overcast clouds",
                        "timestamp": "2024-05-01 12:00:00"},
            "forecast": [
                {"date": "2024-05-01", "apiTemp": 12.0, "mlTemp": 15.5, "condition": "rain"},
                {"date": "2024-05-02", "apiTemp": 13.0, "mlTemp": null}
            ]
        }));

        assert_eq!(result.location.as_deref(), Some("London"));
        assert_eq!(result.current.temp, Some(12.3));
        assert!(result.current.ml_temp.is_none());

        let first = &result.forecast[0];
        assert_eq!(first.variance_class, "high");
        assert_eq!(first.variance_text, "3.5°C");

        let second = &result.forecast[1];
        assert_eq!(second.variance(), None);
        assert_eq!(second.variance_class, "none");
    }

    #[test]
    fn test_missing_forecast_is_empty() {
        let result = parse(serde_json::json!({"current": {}}));
        assert!(result.forecast.is_empty());
        assert_eq!(result.max_variance(), 0.0);
        assert_eq!(result.variance_level(), VarianceLevel::Low);
    }

    #[test]
    fn test_forecast_day_serializes_camel_case() {
        let day = ForecastDay {
            date: "2024-05-01".into(),
            ml_temp: Some(1.0),
            api_temp: 2.0,
            variance_class: "low".into(),
            variance_text: "1.0°C".into(),
            condition: None,
            humidity: None,
            pressure: None,
            wind_speed: None,
        };
        let json = serde_json::to_string(&day).unwrap();
        assert!(json.contains("\"mlTemp\":1.0"));
        assert!(json.contains("\"varianceClass\":\"low\""));
    }
}
