//! Normalized, unit-aware view model.
//!
//! Values here are built once per fetch and never mutated. Renderers only
//! select fields; all unit math already happened in [`crate::shaper`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    condition::IconKey,
    units::{Distance, Precipitation, Speed, Temperature},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: Option<String>,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
}

impl Location {
    /// `"name, country"`, or just the name when the country is missing.
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: Option<String>,
    pub icon: IconKey,
    /// Provider icon, with protocol-relative URLs upgraded to https.
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: Option<Speed>,
    /// Degrees, from the numeric field when present, else from the label.
    pub angle: Option<u16>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub so2: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    /// US-EPA index, 1–6.
    pub index: Option<u8>,
    pub label: String,
    pub gb_defra_index: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub observed_at: Option<i64>,
    pub temperature: Option<Temperature>,
    pub feels_like: Option<Temperature>,
    pub wind: Wind,
    pub humidity: Option<u8>,
    pub pressure_mb: Option<f64>,
    pub precipitation: Option<Precipitation>,
    pub visibility: Option<Distance>,
    pub cloud: Option<u8>,
    pub condition: Condition,
    pub uv: Option<f64>,
    pub air_quality: Option<AirQuality>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    /// Epoch milliseconds; strictly increasing within a snapshot.
    pub timestamp: i64,
    pub temperature: Option<Temperature>,
    pub feels_like: Option<Temperature>,
    pub wind: Wind,
    pub humidity: Option<u8>,
    pub precipitation: Option<Precipitation>,
    pub visibility: Option<Distance>,
    pub chance_of_rain: Option<u8>,
    pub cloud: Option<u8>,
    pub condition: Condition,
    pub uv: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub min_temperature: Option<Temperature>,
    pub max_temperature: Option<Temperature>,
    pub max_wind: Option<Speed>,
    pub avg_humidity: Option<f64>,
    pub total_precipitation: Option<Precipitation>,
    pub avg_visibility: Option<Distance>,
    pub chance_of_rain: Option<u8>,
    pub condition: Condition,
    pub uv: Option<f64>,
}

/// Entries the shaper skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeDiagnostics {
    pub dropped_hours: usize,
    pub dropped_days: usize,
}

/// Everything known about one city from one fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: Option<CurrentConditions>,
    pub hourly: Vec<HourlyRecord>,
    pub daily: Vec<DailyRecord>,
    pub diagnostics: ShapeDiagnostics,
}
