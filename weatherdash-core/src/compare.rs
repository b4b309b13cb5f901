//! Two-city comparison.

use serde::Serialize;

use crate::{
    condition::IconKey,
    model::WeatherSnapshot,
    units::{Speed, Temperature},
};

/// The fields the comparison view shows for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySummary {
    pub name: String,
    pub temperature: Option<Temperature>,
    pub wind: Option<Speed>,
    pub humidity: Option<u8>,
    pub icon: IconKey,
    pub condition: Option<String>,
    pub uv: Option<f64>,
}

impl CitySummary {
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        let current = snapshot.current.as_ref();
        Self {
            name: snapshot.location.label(),
            temperature: current.and_then(|c| c.temperature),
            wind: current.and_then(|c| c.wind.speed),
            humidity: current.and_then(|c| c.humidity),
            icon: current.map(|c| c.condition.icon).unwrap_or_default(),
            condition: current.and_then(|c| c.condition.text.clone()),
            uv: current.and_then(|c| c.uv),
        }
    }
}

/// Per-unit differences, `first - second`. Each unit is subtracted from its
/// own stored field, so no value is converted here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureDelta {
    pub celsius: f64,
    pub fahrenheit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Warmer {
    First,
    Second,
    Same,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityComparison {
    pub first: CitySummary,
    pub second: CitySummary,
    pub temperature_delta: Option<TemperatureDelta>,
    pub humidity_delta: Option<i16>,
    pub warmer: Option<Warmer>,
}

pub fn compare_cities(first: &WeatherSnapshot, second: &WeatherSnapshot) -> CityComparison {
    let first = CitySummary::from_snapshot(first);
    let second = CitySummary::from_snapshot(second);

    let temperature_delta = match (first.temperature, second.temperature) {
        (Some(a), Some(b)) => Some(TemperatureDelta {
            celsius: a.celsius - b.celsius,
            fahrenheit: a.fahrenheit - b.fahrenheit,
        }),
        _ => None,
    };

    let warmer = temperature_delta.map(|d| {
        if d.celsius > 0.0 {
            Warmer::First
        } else if d.celsius < 0.0 {
            Warmer::Second
        } else {
            Warmer::Same
        }
    });

    let humidity_delta = match (first.humidity, second.humidity) {
        (Some(a), Some(b)) => Some(i16::from(a) - i16::from(b)),
        _ => None,
    };

    CityComparison { first, second, temperature_delta, humidity_delta, warmer }
}
