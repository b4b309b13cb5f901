//! Dashboard view state.
//!
//! One immutable value holds every UI toggle. Each change returns a new
//! value that replaces the old one; nothing is flipped in place.

use serde::{Deserialize, Serialize};

use crate::{
    model::WeatherSnapshot,
    units::{DisplayUnits, SpeedUnit, TemperatureUnit},
};

/// City proposed when comparison is switched on without one.
pub const DEFAULT_COMPARISON_CITY: &str = "Barcelona";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Optional panels of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Features {
    pub comparison: bool,
    pub uv_panel: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    city: String,
    comparison_city: Option<String>,
    units: DisplayUnits,
    theme: Theme,
    features: Features,
}

impl ViewState {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            comparison_city: None,
            units: DisplayUnits::default(),
            theme: Theme::default(),
            features: Features::default(),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn comparison_city(&self) -> Option<&str> {
        self.comparison_city.as_deref()
    }

    pub fn units(&self) -> DisplayUnits {
        self.units
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn with_city(self, city: impl Into<String>) -> Self {
        Self { city: city.into(), ..self }
    }

    pub fn with_units(self, units: DisplayUnits) -> Self {
        Self { units, ..self }
    }

    pub fn with_temperature_unit(self, temperature: TemperatureUnit) -> Self {
        let units = DisplayUnits { temperature, ..self.units };
        Self { units, ..self }
    }

    pub fn with_speed_unit(self, speed: SpeedUnit) -> Self {
        let units = DisplayUnits { speed, ..self.units };
        Self { units, ..self }
    }

    pub fn with_theme_toggled(self) -> Self {
        Self { theme: self.theme.toggled(), ..self }
    }

    pub fn with_uv_panel(self, uv_panel: bool) -> Self {
        Self { features: Features { uv_panel, ..self.features }, ..self }
    }

    /// Turning comparison on keeps an existing comparison city or proposes
    /// [`DEFAULT_COMPARISON_CITY`]; turning it off clears the city.
    pub fn with_comparison(self, enabled: bool) -> Self {
        let comparison_city = if enabled {
            self.comparison_city.clone().or_else(|| Some(DEFAULT_COMPARISON_CITY.to_string()))
        } else {
            None
        };
        Self { comparison_city, features: Features { comparison: enabled, ..self.features }, ..self }
    }

    pub fn with_comparison_city(self, city: impl Into<String>) -> Self {
        Self {
            comparison_city: Some(city.into()),
            features: Features { comparison: true, ..self.features },
            ..self
        }
    }

    /// The UV panel shows only when enabled and the snapshot has a UV index.
    pub fn shows_uv(&self, snapshot: &WeatherSnapshot) -> bool {
        self.features.uv_panel && snapshot.current.as_ref().is_some_and(|c| c.uv.is_some())
    }
}
