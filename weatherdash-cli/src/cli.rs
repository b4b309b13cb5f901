use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, Password, Select, Text};
use tracing::debug;
use weatherdash_core::{
    Config, DashboardService, DataSource, DisplayUnits, SpeedUnit, TemperatureUnit, ViewState,
    WeatherSnapshot, compare_cities, model::HourlyRecord, upcoming_hours,
    window::DEFAULT_WINDOW_HOURS,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Display and data-source flags shared by the viewing commands.
#[derive(Debug, Clone, Copy, Args)]
pub struct ViewArgs {
    /// Show temperatures in °F.
    #[arg(long)]
    fahrenheit: bool,

    /// Show wind in mph (and precipitation/visibility in inches/miles).
    #[arg(long)]
    mph: bool,

    /// Use bundled mock data instead of the configured source.
    #[arg(long)]
    mock: bool,
}

impl ViewArgs {
    fn units(&self, config: &Config) -> DisplayUnits {
        let mut units = config.units;
        if self.fahrenheit {
            units.temperature = TemperatureUnit::Fahrenheit;
        }
        if self.mph {
            units.speed = SpeedUnit::Mph;
        }
        units
    }

    fn service(&self, config: &Config) -> anyhow::Result<DashboardService> {
        let id = if self.mock { DataSource::Mock } else { config.data_source_id()? };
        DashboardService::from_config(config, id)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose the data source and store the WeatherAPI.com key.
    Configure,

    /// Show current conditions and the forecast for a city.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,

        /// Number of upcoming hours to list.
        #[arg(long, default_value_t = DEFAULT_WINDOW_HOURS)]
        hours: usize,

        /// Include the UV panel.
        #[arg(long)]
        uv: bool,

        /// Add a comparison with this city (implies the comparison panel).
        #[arg(long, value_name = "CITY")]
        compare_with: Option<String>,

        /// Print the normalized snapshot as JSON.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Compare current conditions in two cities.
    Compare {
        city: String,
        other: String,

        #[command(flatten)]
        view: ViewArgs,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, hours, uv, compare_with, json, view } => {
                let config = Config::load()?;
                let state = view_state(&config, city, uv, compare_with, view);
                show(&config, &state, hours, json, view).await
            }
            Command::Compare { city, other, view } => compare(&city, &other, view).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let source = Select::new("Data source:", DataSource::all().to_vec()).prompt()?;
    if source == DataSource::Live {
        let key = Password::new("WeatherAPI.com API key:").without_confirmation().prompt()?;
        config.set_api_key(key.trim().to_string());

        config.fallback_to_mock = Confirm::new("Fall back to mock data when the live API fails?")
            .with_default(config.fallback_to_mock)
            .prompt()?;
    }
    config.set_data_source(source);

    let city = Text::new("Default city:").with_default(&config.default_city).prompt()?;
    if !city.trim().is_empty() {
        config.default_city = city.trim().to_string();
    }

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// Build the view from config defaults and command-line overrides.
fn view_state(
    config: &Config,
    city: Option<String>,
    uv: bool,
    compare_with: Option<String>,
    args: ViewArgs,
) -> ViewState {
    let city = city.unwrap_or_else(|| config.default_city.clone());
    let view = ViewState::new(city)
        .with_units(args.units(config))
        .with_uv_panel(uv || config.features.uv_panel)
        .with_comparison(config.features.comparison);
    match compare_with {
        Some(other) => view.with_comparison_city(other),
        None => view,
    }
}

async fn show(
    config: &Config,
    view: &ViewState,
    hours: usize,
    json: bool,
    args: ViewArgs,
) -> anyhow::Result<()> {
    let service = args.service(config)?;
    let loaded = service.load(view.city()).await?;
    let loaded = service.accept(loaded).context("A newer request superseded this load")?;
    if loaded.from_fallback {
        warn_fallback(view.city());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&loaded.snapshot)?);
        return Ok(());
    }

    let upcoming = upcoming_window(&loaded.snapshot, hours);
    print!("{}", render::dashboard(&loaded.snapshot, view, upcoming));

    if let Some(other) = view.comparison_city() {
        let (snapshot, from_fallback) = service.fetch_with_fallback(other).await?;
        if from_fallback {
            warn_fallback(other);
        }
        let comparison = compare_cities(&loaded.snapshot, &snapshot);
        print!("\nComparison\n{}", render::comparison(&comparison, view.units()));
    }
    Ok(())
}

async fn compare(city: &str, other: &str, args: ViewArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let service = args.service(&config)?;

    let (first, second) =
        tokio::join!(service.fetch_with_fallback(city), service.fetch_with_fallback(other));
    let (first, first_mock) = first?;
    let (second, second_mock) = second?;
    for (name, from_fallback) in [(city, first_mock), (other, second_mock)] {
        if from_fallback {
            warn_fallback(name);
        }
    }

    let comparison = compare_cities(&first, &second);
    print!("{}", render::comparison(&comparison, args.units(&config)));
    Ok(())
}

fn warn_fallback(city: &str) {
    eprintln!("warning: live data unavailable for {city}, showing mock data");
}

/// Upcoming hours from now. Bundled or stale data may lie entirely in the
/// past, in which case the window is anchored at the observation time instead.
fn upcoming_window(snapshot: &WeatherSnapshot, hours: usize) -> &[HourlyRecord] {
    let now = Utc::now().timestamp_millis();
    let window = upcoming_hours(&snapshot.hourly, now, hours);
    if !window.is_empty() {
        return window;
    }

    let anchor = snapshot
        .current
        .as_ref()
        .and_then(|c| c.observed_at)
        .or_else(|| snapshot.hourly.first().map(|h| h.timestamp));
    match anchor {
        Some(anchor) => {
            debug!(anchor, "no upcoming hours, anchoring window at observation time");
            upcoming_hours(&snapshot.hourly, anchor, hours)
        }
        None => window,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weatherdash_core::view::DEFAULT_COMPARISON_CITY;

    fn args() -> ViewArgs {
        ViewArgs { fahrenheit: false, mph: false, mock: true }
    }

    #[test]
    fn comparison_follows_config_flag() {
        let mut config = Config::default();
        let view = view_state(&config, None, false, None, args());
        assert_eq!(view.city(), config.default_city);
        assert_eq!(view.comparison_city(), None);

        config.features.comparison = true;
        let view = view_state(&config, Some("Lisbon".into()), false, None, args());
        assert_eq!(view.city(), "Lisbon");
        assert_eq!(view.comparison_city(), Some(DEFAULT_COMPARISON_CITY));
    }

    #[test]
    fn compare_with_flag_enables_comparison() {
        let config = Config::default();
        let view = view_state(&config, None, false, Some("Oslo".into()), args());
        assert_eq!(view.comparison_city(), Some("Oslo"));
        assert!(view.features().comparison);
    }

    #[test]
    fn unit_flags_override_config() {
        let config = Config::default();
        let flags = ViewArgs { fahrenheit: true, mph: false, mock: true };
        let view = view_state(&config, None, true, None, flags);

        assert_eq!(view.units().temperature, TemperatureUnit::Fahrenheit);
        assert_eq!(view.units().speed, SpeedUnit::Kmh);
        assert!(view.features().uv_panel);
    }
}
