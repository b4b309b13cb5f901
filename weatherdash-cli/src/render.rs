//! Plain-text rendering of snapshots and comparisons.

use std::fmt::Write;

use chrono::{Local, TimeZone};
use weatherdash_core::{
    DisplayUnits, TemperatureUnit, ViewState, WeatherSnapshot,
    compare::{CityComparison, Warmer},
    model::{HourlyRecord, Wind},
    uv::uv_band,
};

const MISSING: &str = "-";

pub fn dashboard(snapshot: &WeatherSnapshot, view: &ViewState, upcoming: &[HourlyRecord]) -> String {
    let units = view.units();
    let mut out = String::new();

    let _ = writeln!(out, "{}", snapshot.location.label());

    if let Some(current) = &snapshot.current {
        let cond = &current.condition;
        let _ = writeln!(
            out,
            "  {} {}  {}",
            cond.icon.glyph(),
            or_missing(current.temperature.map(|t| t.display(units.temperature))),
            cond.text.as_deref().unwrap_or(MISSING),
        );
        let _ = writeln!(
            out,
            "  Feels like {}  Humidity {}  Wind {}",
            or_missing(current.feels_like.map(|t| t.display(units.temperature))),
            or_missing(current.humidity.map(|h| format!("{h}%"))),
            wind(&current.wind, units),
        );
        let _ = writeln!(
            out,
            "  Precipitation {}  Visibility {}  Air quality {}",
            or_missing(current.precipitation.map(|p| p.display(units.speed))),
            or_missing(current.visibility.map(|v| v.display(units.speed))),
            current.air_quality.as_ref().map_or(MISSING, |aq| aq.label.as_str()),
        );

        if let Some(uv) = current.uv.filter(|_| view.shows_uv(snapshot)) {
            let band = uv_band(uv);
            let _ = writeln!(out, "  UV {uv} ({}): {}", band.label(), band.advice());
        }
    }

    if !upcoming.is_empty() {
        let _ = writeln!(out, "\nNext {} hours", upcoming.len());
        for hour in upcoming {
            let _ = writeln!(
                out,
                "  {}  {} {:>6}  rain {:>4}  {}",
                local_time(hour.timestamp),
                hour.condition.icon.glyph(),
                or_missing(hour.temperature.map(|t| t.display(units.temperature))),
                or_missing(hour.chance_of_rain.map(|c| format!("{c}%"))),
                wind(&hour.wind, units),
            );
        }
    }

    if !snapshot.daily.is_empty() {
        let _ = writeln!(out, "\nForecast");
        for day in &snapshot.daily {
            let _ = writeln!(
                out,
                "  {}  {} {:>6} / {:<6}  {}",
                day.date.format("%a %d %b"),
                day.condition.icon.glyph(),
                or_missing(day.min_temperature.map(|t| t.display(units.temperature))),
                or_missing(day.max_temperature.map(|t| t.display(units.temperature))),
                day.condition.text.as_deref().unwrap_or(MISSING),
            );
        }
    }

    out
}

pub fn comparison(comparison: &CityComparison, units: DisplayUnits) -> String {
    let mut out = String::new();
    for city in [&comparison.first, &comparison.second] {
        let _ = writeln!(
            out,
            "{} {:<20} {:>6}  humidity {:>4}  wind {}",
            city.icon.glyph(),
            city.name,
            or_missing(city.temperature.map(|t| t.display(units.temperature))),
            or_missing(city.humidity.map(|h| format!("{h}%"))),
            or_missing(city.wind.map(|w| w.display(units.speed))),
        );
    }

    let verdict = match comparison.warmer {
        Some(Warmer::First) => format!("{} is warmer", comparison.first.name),
        Some(Warmer::Second) => format!("{} is warmer", comparison.second.name),
        Some(Warmer::Same) => "Same temperature".to_string(),
        None => "Temperatures unavailable".to_string(),
    };
    let _ = write!(out, "{verdict}");
    if let Some(delta) = comparison.temperature_delta {
        let value = match units.temperature {
            TemperatureUnit::Celsius => delta.celsius,
            TemperatureUnit::Fahrenheit => delta.fahrenheit,
        };
        let _ = write!(out, " (difference {}{})", value.abs().round(), units.temperature.symbol());
    }
    out.push('\n');
    out
}

fn wind(wind: &Wind, units: DisplayUnits) -> String {
    let speed = or_missing(wind.speed.map(|s| s.display(units.speed)));
    match (&wind.label, wind.angle) {
        (Some(label), Some(angle)) => format!("{speed} {label} ({angle}°)"),
        (None, Some(angle)) => format!("{speed} {angle}°"),
        (Some(label), None) => format!("{speed} {label}"),
        (None, None) => speed,
    }
}

fn local_time(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map_or_else(|| MISSING.to_string(), |t| t.format("%a %H:%M").to_string())
}

fn or_missing(value: Option<String>) -> String {
    value.unwrap_or_else(|| MISSING.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weatherdash_core::{
        compare_cities, provider::mock::MockSource, shape_forecast, upcoming_hours,
    };

    fn snapshot(city: &str) -> WeatherSnapshot {
        let payload = MockSource.payload_for(city).expect("mock payload");
        shape_forecast(&payload).expect("mock data should shape")
    }

    #[test]
    fn dashboard_lists_current_hours_and_days() {
        let snap = snapshot("London");
        let view = ViewState::new("London");
        let hours = upcoming_hours(&snap.hourly, snap.hourly[0].timestamp, 3);

        let text = dashboard(&snap, &view, hours);
        assert!(text.starts_with("London, United Kingdom"));
        assert!(text.contains("15°C"));
        assert!(text.contains("Next 3 hours"));
        assert!(text.contains("Forecast"));
        assert!(!text.contains("UV "));
    }

    #[test]
    fn dashboard_honours_units_and_uv_panel() {
        let snap = snapshot("London");
        let view = ViewState::new("London")
            .with_units(DisplayUnits::imperial())
            .with_uv_panel(true);

        let text = dashboard(&snap, &view, &[]);
        assert!(text.contains("59°F"));
        assert!(text.contains("mph"));
        assert!(text.contains("UV 4 (Moderate)"));
        assert!(!text.contains("Next"));
    }

    #[test]
    fn comparison_names_warmer_city() {
        let warm = shape_forecast(
            &serde_json::from_str(
                &include_str!("../../weatherdash-core/data/mock_london.json")
                    .replacen("\"temp_c\": 15.0", "\"temp_c\": 25.0", 1),
            )
            .expect("valid json"),
        )
        .expect("shapes");
        let cmp = compare_cities(&snapshot("Oslo"), &warm);

        let text = comparison(&cmp, DisplayUnits::default());
        assert!(text.contains("London, United Kingdom is warmer"));
        assert!(text.contains("(difference 10°C)"));
    }

    #[test]
    fn missing_wind_fields_render_placeholder() {
        let calm = Wind { speed: None, angle: None, label: None };
        assert_eq!(wind(&calm, DisplayUnits::default()), "-");

        let labelled = Wind { speed: None, angle: Some(230), label: Some("SW".into()) };
        assert_eq!(wind(&labelled, DisplayUnits::default()), "- SW (230°)");
    }
}
