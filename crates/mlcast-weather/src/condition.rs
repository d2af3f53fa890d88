use serde::{Deserialize, Serialize};

/// Weather condition categories matched from backend condition text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    #[default]
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Haze,
    Wind,
}

/// Keywords checked in order; the first one contained in the text wins.
const KEYWORDS: &[(&str, WeatherCondition)] = &[
    ("clear", WeatherCondition::Clear),
    ("clouds", WeatherCondition::Clouds),
    ("rain", WeatherCondition::Rain),
    ("drizzle", WeatherCondition::Drizzle),
    ("thunderstorm", WeatherCondition::Thunderstorm),
    ("snow", WeatherCondition::Snow),
    ("mist", WeatherCondition::Haze),
    ("smoke", WeatherCondition::Haze),
    ("haze", WeatherCondition::Haze),
    ("dust", WeatherCondition::Haze),
    ("fog", WeatherCondition::Haze),
    ("sand", WeatherCondition::Haze),
    ("ash", WeatherCondition::Haze),
    ("squall", WeatherCondition::Wind),
    ("tornado", WeatherCondition::Wind),
];

impl WeatherCondition {
    /// Match free-form condition text such as "light rain" or "overcast clouds".
    /// Unknown text falls back to `Clouds`.
    pub fn from_description(text: &str) -> Self {
        let lower = text.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, condition)| *condition)
            .unwrap_or_default()
    }

    /// Icon name for the renderer's icon set
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::Clouds => "cloud",
            Self::Rain => "cloud_rain",
            Self::Drizzle => "cloud_sun_rain",
            Self::Thunderstorm => "bolt",
            Self::Snow => "snowflake",
            Self::Haze => "smog",
            Self::Wind => "wind",
        }
    }
}

/// Icon for free-form condition text, `cloud` when nothing matches.
pub fn icon_for_condition(text: &str) -> &'static str {
    WeatherCondition::from_description(text).icon_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_for_condition_text() {
        assert_eq!(icon_for_condition("Clear sky"), "sun");
        assert_eq!(icon_for_condition("thunderstorm with heavy rain"), "cloud_rain");
        assert_eq!(icon_for_condition("volcanic ash"), "smog");
        assert_eq!(icon_for_condition("something new"), "cloud");
    }

    #[test]
    fn test_clear_sky() {
        assert_eq!(WeatherCondition::from_description("clear sky"), WeatherCondition::Clear);
    }

    #[test]
    fn test_clouds() {
        assert_eq!(
            WeatherCondition::from_description("Overcast Clouds"),
            WeatherCondition::Clouds
        );
    }

    #[test]
    fn test_rain_checked_before_thunderstorm() {
        assert_eq!(
            WeatherCondition::from_description("thunderstorm with light rain"),
            WeatherCondition::Rain
        );
        assert_eq!(
            WeatherCondition::from_description("thunderstorm"),
            WeatherCondition::Thunderstorm
        );
    }

    #[test]
    fn test_atmosphere_group() {
        for text in ["mist", "smoke", "haze", "sand/dust whirls", "fog", "volcanic ash"] {
            assert_eq!(WeatherCondition::from_description(text), WeatherCondition::Haze, "{text}");
        }
    }

    #[test]
    fn test_unknown_defaults_to_clouds() {
        assert_eq!(WeatherCondition::from_description(""), WeatherCondition::Clouds);
        assert_eq!(WeatherCondition::from_description("sunny"), WeatherCondition::Clouds);
    }

    #[test]
    fn test_icon_name() {
        assert_eq!(WeatherCondition::Clear.icon_name(), "sun");
        assert_eq!(WeatherCondition::Drizzle.icon_name(), "cloud_sun_rain");
        assert_eq!(WeatherCondition::Wind.icon_name(), "wind");
    }
}
