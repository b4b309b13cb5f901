//! Core library for the `weatherdash` dashboard.
//!
//! This crate defines:
//! - Unit conversion and unit-pair value types
//! - Condition, wind and air-quality normalization
//! - Shaping of raw WeatherAPI.com payloads into a unit-aware view model
//! - Hourly windowing, UV bands and two-city comparison
//! - Data sources (live and mock), load orchestration and configuration
//!
//! The normalization modules (`units`, `condition`, `uv`, `shaper`, `window`,
//! `compare`) are pure and synchronous. Only `provider` and `service` do I/O.

pub mod compare;
pub mod condition;
pub mod config;
pub mod error;
pub mod model;
pub mod payload;
pub mod provider;
pub mod request;
pub mod service;
pub mod shaper;
pub mod units;
pub mod uv;
pub mod view;
pub mod window;

pub use compare::{CityComparison, compare_cities};
pub use condition::{
    IconKey, WindDirection, air_quality_index_to_label, normalize_condition,
    wind_direction_to_angle,
};
pub use config::Config;
pub use error::{LoadError, ShapeError};
pub use model::{DailyRecord, HourlyRecord, WeatherSnapshot};
pub use payload::RawPayload;
pub use provider::{DataSource, WeatherSource};
pub use service::{DashboardService, Loaded};
pub use shaper::{shape_forecast, shape_forecast_json, shape_forecast_value};
pub use units::{DisplayUnits, SpeedUnit, TemperatureUnit, celsius_to_fahrenheit, kph_to_mph};
pub use view::ViewState;
pub use window::upcoming_hours;
