//! Unit conversion and display-unit selection.
//!
//! Conversions run once, when a record is normalized. Every pair type below can
//! only be built from its metric value through these converters, so the
//! imperial field is always the converted metric field and never a second
//! conversion of an already converted number.

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

const KPH_TO_MPH: f64 = 0.621371;
const MM_TO_INCHES: f64 = 0.0393701;
const KM_TO_MILES: f64 = 0.621371;

fn finite(value: f64) -> Result<f64, ShapeError> {
    if value.is_finite() { Ok(value) } else { Err(ShapeError::InvalidInput { value }) }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `round(c * 9/5 + 32)`.
pub fn celsius_to_fahrenheit(celsius: f64) -> Result<f64, ShapeError> {
    Ok((finite(celsius)? * 9.0 / 5.0 + 32.0).round())
}

/// `round(kph * 0.621371)`.
pub fn kph_to_mph(kph: f64) -> Result<f64, ShapeError> {
    Ok((finite(kph)? * KPH_TO_MPH).round())
}

/// Millimetres to inches, kept to two decimals.
pub fn mm_to_inches(mm: f64) -> Result<f64, ShapeError> {
    Ok(round_to(finite(mm)? * MM_TO_INCHES, 2))
}

/// Kilometres to miles, kept to one decimal.
pub fn km_to_miles(km: f64) -> Result<f64, ShapeError> {
    Ok(round_to(finite(km)? * KM_TO_MILES, 1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

/// Wind speed unit. Precipitation and visibility follow it: km/h shows
/// millimetres and kilometres, mph shows inches and miles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    #[default]
    Kmh,
    Mph,
}

impl SpeedUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            SpeedUnit::Kmh => "km/h",
            SpeedUnit::Mph => "mph",
        }
    }

    pub fn is_metric(&self) -> bool {
        matches!(self, SpeedUnit::Kmh)
    }
}

/// The units a view renders with. Passed explicitly; nothing in the core reads
/// it from shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DisplayUnits {
    pub temperature: TemperatureUnit,
    pub speed: SpeedUnit,
}

impl DisplayUnits {
    pub fn new(temperature: TemperatureUnit, speed: SpeedUnit) -> Self {
        Self { temperature, speed }
    }

    pub fn imperial() -> Self {
        Self::new(TemperatureUnit::Fahrenheit, SpeedUnit::Mph)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub celsius: f64,
    pub fahrenheit: f64,
}

impl Temperature {
    pub fn from_celsius(celsius: f64) -> Result<Self, ShapeError> {
        Ok(Self { celsius, fahrenheit: celsius_to_fahrenheit(celsius)? })
    }

    pub fn select(&self, unit: TemperatureUnit) -> f64 {
        match unit {
            TemperatureUnit::Celsius => self.celsius,
            TemperatureUnit::Fahrenheit => self.fahrenheit,
        }
    }

    /// Rounded value with its unit symbol, e.g. `20°C`. Never `-0°C`.
    pub fn display(&self, unit: TemperatureUnit) -> String {
        format!("{}{}", self.select(unit).round() + 0.0, unit.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    pub kph: f64,
    pub mph: f64,
}

impl Speed {
    pub fn from_kph(kph: f64) -> Result<Self, ShapeError> {
        Ok(Self { kph, mph: kph_to_mph(kph)? })
    }

    pub fn select(&self, unit: SpeedUnit) -> f64 {
        match unit {
            SpeedUnit::Kmh => self.kph,
            SpeedUnit::Mph => self.mph,
        }
    }

    pub fn display(&self, unit: SpeedUnit) -> String {
        format!("{} {}", self.select(unit), unit.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Precipitation {
    pub mm: f64,
    pub inches: f64,
}

impl Precipitation {
    pub fn from_mm(mm: f64) -> Result<Self, ShapeError> {
        Ok(Self { mm, inches: mm_to_inches(mm)? })
    }

    pub fn select(&self, unit: SpeedUnit) -> f64 {
        if unit.is_metric() { self.mm } else { self.inches }
    }

    pub fn display(&self, unit: SpeedUnit) -> String {
        if unit.is_metric() {
            format!("{} mm", self.mm)
        } else {
            format!("{} in", self.inches)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub km: f64,
    pub miles: f64,
}

impl Distance {
    pub fn from_km(km: f64) -> Result<Self, ShapeError> {
        Ok(Self { km, miles: km_to_miles(km)? })
    }

    pub fn select(&self, unit: SpeedUnit) -> f64 {
        if unit.is_metric() { self.km } else { self.miles }
    }

    pub fn display(&self, unit: SpeedUnit) -> String {
        if unit.is_metric() {
            format!("{} km", self.km)
        } else {
            format!("{} mi", self.miles)
        }
    }
}
