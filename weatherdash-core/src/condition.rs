//! Condition text, wind direction and air-quality normalization.
//!
//! None of these lookups fail: anything unrecognized resolves to a fixed
//! fallback so a single odd string never blocks a forecast from rendering.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Canonical icon identifier for a weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IconKey {
    Sunny,
    Clear,
    PartlyCloudy,
    Cloudy,
    Overcast,
    Mist,
    Fog,
    LightRainShower,
    Rain,
    HeavyRain,
    Drizzle,
    Sleet,
    Snow,
    Thunderstorm,
    #[default]
    Unknown,
}

impl IconKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconKey::Sunny => "sunny",
            IconKey::Clear => "clear",
            IconKey::PartlyCloudy => "partly-cloudy",
            IconKey::Cloudy => "cloudy",
            IconKey::Overcast => "overcast",
            IconKey::Mist => "mist",
            IconKey::Fog => "fog",
            IconKey::LightRainShower => "light-rain-shower",
            IconKey::Rain => "rain",
            IconKey::HeavyRain => "heavy-rain",
            IconKey::Drizzle => "drizzle",
            IconKey::Sleet => "sleet",
            IconKey::Snow => "snow",
            IconKey::Thunderstorm => "thunderstorm",
            IconKey::Unknown => "unknown",
        }
    }

    /// Single glyph for text output.
    pub fn glyph(&self) -> &'static str {
        match self {
            IconKey::Sunny | IconKey::Clear => "☀",
            IconKey::PartlyCloudy => "⛅",
            IconKey::Cloudy | IconKey::Overcast => "☁",
            IconKey::Mist | IconKey::Fog => "🌫",
            IconKey::LightRainShower | IconKey::Drizzle => "🌦",
            IconKey::Rain | IconKey::HeavyRain => "🌧",
            IconKey::Sleet | IconKey::Snow => "❄",
            IconKey::Thunderstorm => "⛈",
            IconKey::Unknown => "?",
        }
    }
}

impl std::fmt::Display for IconKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact provider strings, matched case-sensitively.
const CONDITION_TABLE: &[(&str, IconKey)] = &[
    ("Sunny", IconKey::Sunny),
    ("Clear", IconKey::Clear),
    ("Partly cloudy", IconKey::PartlyCloudy),
    ("Partly Cloudy", IconKey::PartlyCloudy),
    ("Cloudy", IconKey::Cloudy),
    ("Overcast", IconKey::Overcast),
    ("Mist", IconKey::Mist),
    ("Fog", IconKey::Fog),
    ("Freezing fog", IconKey::Fog),
    ("Patchy rain possible", IconKey::LightRainShower),
    ("Patchy rain nearby", IconKey::LightRainShower),
    ("Patchy light rain", IconKey::LightRainShower),
    ("Light rain", IconKey::LightRainShower),
    ("Light rain shower", IconKey::LightRainShower),
    ("Moderate rain at times", IconKey::Rain),
    ("Moderate rain", IconKey::Rain),
    ("Heavy rain at times", IconKey::HeavyRain),
    ("Heavy rain", IconKey::HeavyRain),
    ("Moderate or heavy rain shower", IconKey::HeavyRain),
    ("Torrential rain shower", IconKey::HeavyRain),
    ("Patchy light drizzle", IconKey::Drizzle),
    ("Light drizzle", IconKey::Drizzle),
    ("Patchy freezing drizzle possible", IconKey::Sleet),
    ("Freezing drizzle", IconKey::Sleet),
    ("Heavy freezing drizzle", IconKey::Sleet),
    ("Light freezing rain", IconKey::Sleet),
    ("Moderate or heavy freezing rain", IconKey::Sleet),
    ("Patchy sleet possible", IconKey::Sleet),
    ("Light sleet", IconKey::Sleet),
    ("Moderate or heavy sleet", IconKey::Sleet),
    ("Ice pellets", IconKey::Sleet),
    ("Patchy snow possible", IconKey::Snow),
    ("Patchy light snow", IconKey::Snow),
    ("Light snow", IconKey::Snow),
    ("Patchy moderate snow", IconKey::Snow),
    ("Moderate snow", IconKey::Snow),
    ("Patchy heavy snow", IconKey::Snow),
    ("Heavy snow", IconKey::Snow),
    ("Blowing snow", IconKey::Snow),
    ("Blizzard", IconKey::Snow),
    ("Light snow showers", IconKey::Snow),
    ("Thundery outbreaks possible", IconKey::Thunderstorm),
    ("Thundery outbreaks in nearby", IconKey::Thunderstorm),
    ("Patchy light rain with thunder", IconKey::Thunderstorm),
    ("Moderate or heavy rain with thunder", IconKey::Thunderstorm),
    ("Patchy light snow with thunder", IconKey::Thunderstorm),
    ("Moderate or heavy snow with thunder", IconKey::Thunderstorm),
];

/// Resolve a provider condition string to an icon key.
///
/// Exact table lookup first. On a miss the text is checked, lowercased, for
/// these substrings in order: "rain" (lighter variant when it also says
/// "patchy" or "possible"), then "cloud", then "drizzle". Anything else is
/// [`IconKey::Unknown`].
pub fn normalize_condition(text: Option<&str>) -> IconKey {
    let Some(text) = text else {
        return IconKey::Unknown;
    };

    if let Some((_, key)) = CONDITION_TABLE.iter().find(|(name, _)| *name == text) {
        return *key;
    }

    let lower = text.to_lowercase();
    let key = if lower.contains("rain") {
        if lower.contains("patchy") || lower.contains("possible") {
            IconKey::LightRainShower
        } else {
            IconKey::Rain
        }
    } else if lower.contains("cloud") {
        IconKey::Cloudy
    } else if lower.contains("drizzle") {
        IconKey::Drizzle
    } else {
        IconKey::Unknown
    };

    debug!(condition = text, icon = %key, "condition not in table, used substring fallback");
    key
}

/// A wind direction as providers report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindDirection {
    Degrees(u16),
    Label(String),
}

impl From<u16> for WindDirection {
    fn from(degrees: u16) -> Self {
        WindDirection::Degrees(degrees)
    }
}

impl From<&str> for WindDirection {
    fn from(label: &str) -> Self {
        WindDirection::Label(label.to_string())
    }
}

impl From<String> for WindDirection {
    fn from(label: String) -> Self {
        WindDirection::Label(label)
    }
}

/// 8-point compass. Abbreviations, English names and the Spanish names the
/// dashboard used are all accepted.
const COMPASS: &[(&[&str], u16)] = &[
    (&["N", "NORTH", "NORTE"], 0),
    (&["NE", "NORTHEAST", "NORTH-EAST", "NORESTE"], 45),
    (&["E", "EAST", "ESTE"], 90),
    (&["SE", "SOUTHEAST", "SOUTH-EAST", "SURESTE"], 135),
    (&["S", "SOUTH", "SUR"], 180),
    (&["SW", "SOUTHWEST", "SOUTH-WEST", "SUROESTE"], 225),
    (&["W", "WEST", "OESTE"], 270),
    (&["NW", "NORTHWEST", "NORTH-WEST", "NOROESTE"], 315),
];

/// Angle in degrees for a wind direction.
///
/// Numeric input is returned unchanged. Labels are matched against the
/// 8-point compass ignoring case and surrounding whitespace. Unknown labels,
/// including 16-point forms such as "NNE", return 0. That default is lossy:
/// it cannot be told apart from a real northerly wind.
pub fn wind_direction_to_angle(direction: impl Into<WindDirection>) -> u16 {
    match direction.into() {
        WindDirection::Degrees(degrees) => degrees,
        WindDirection::Label(label) => {
            let wanted = label.trim().to_uppercase();
            match COMPASS.iter().find(|(names, _)| names.contains(&wanted.as_str())) {
                Some((_, angle)) => *angle,
                None => {
                    debug!(label = %label, "unrecognized wind direction, defaulting to 0");
                    0
                }
            }
        }
    }
}

const AIR_QUALITY_LABELS: [&str; 6] =
    ["Good", "Moderate", "Unhealthy", "Very Unhealthy", "Hazardous", "Extreme"];

/// Label for a 1–6 air-quality index; "Unknown" outside that range.
pub fn air_quality_index_to_label(index: u8) -> &'static str {
    match index {
        1..=6 => AIR_QUALITY_LABELS[usize::from(index - 1)],
        _ => "Unknown",
    }
}
