//! Raw provider payload → [`WeatherSnapshot`].
//!
//! Shaping reads no clock and no ambient state, so identical payloads always
//! produce identical snapshots. Selecting which hours to show is a separate
//! step, see [`crate::window`].

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use tracing::debug;

use crate::{
    condition::{
        WindDirection, air_quality_index_to_label, normalize_condition, wind_direction_to_angle,
    },
    error::ShapeError,
    model::{
        AirQuality, Condition, CurrentConditions, DailyRecord, HourlyRecord, Location,
        ShapeDiagnostics, WeatherSnapshot, Wind,
    },
    payload::{
        RawAirQuality, RawCondition, RawCurrent, RawForecastDay, RawHour, RawLocation, RawPayload,
    },
    units::{Distance, Precipitation, Speed, Temperature},
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";
const QUARTER_HOUR_SECS: i64 = 15 * 60;

/// Parse a JSON document and shape it.
pub fn shape_forecast_json(json: &str) -> Result<WeatherSnapshot, ShapeError> {
    let payload: RawPayload = serde_json::from_str(json)
        .map_err(|e| ShapeError::InvalidPayload(format!("malformed payload JSON: {e}")))?;
    shape_forecast(&payload)
}

pub fn shape_forecast_value(value: serde_json::Value) -> Result<WeatherSnapshot, ShapeError> {
    let payload: RawPayload = serde_json::from_value(value)
        .map_err(|e| ShapeError::InvalidPayload(format!("malformed payload JSON: {e}")))?;
    shape_forecast(&payload)
}

/// Normalize a provider payload.
///
/// Fails with [`ShapeError::InvalidPayload`] when `forecast.forecastday` is
/// missing or empty, or when no day carries an `hour` array. Hours that cannot
/// be read, whose timestamp cannot be parsed, or that do not move strictly
/// forward in time are skipped and counted in [`ShapeDiagnostics`]. Days are
/// handled the same way by date.
pub fn shape_forecast(payload: &RawPayload) -> Result<WeatherSnapshot, ShapeError> {
    let days = payload
        .forecast
        .as_ref()
        .and_then(|f| f.forecastday.as_ref())
        .ok_or_else(|| ShapeError::InvalidPayload("missing forecast.forecastday".into()))?;

    if days.is_empty() {
        return Err(ShapeError::InvalidPayload("forecast.forecastday is empty".into()));
    }
    if days.iter().all(|d| d.hour.is_none()) {
        return Err(ShapeError::InvalidPayload("no forecast day has an hour array".into()));
    }

    let offset = utc_offset(payload.location.as_ref());
    let mut diagnostics = ShapeDiagnostics::default();

    let mut hourly: Vec<HourlyRecord> = Vec::new();
    for entry in days.iter().filter_map(|d| d.hour.as_deref()).flatten() {
        let Some(raw) = entry.hour() else {
            debug!("dropping unreadable hour entry");
            diagnostics.dropped_hours += 1;
            continue;
        };
        let Some(timestamp) = hour_timestamp(raw, offset) else {
            debug!(time = ?raw.time, "dropping hour with unparsable timestamp");
            diagnostics.dropped_hours += 1;
            continue;
        };
        if hourly.last().is_some_and(|prev| timestamp <= prev.timestamp) {
            debug!(timestamp, "dropping hour that does not advance the forecast");
            diagnostics.dropped_hours += 1;
            continue;
        }
        hourly.push(shape_hour(raw, timestamp));
    }

    let mut daily: Vec<DailyRecord> = Vec::new();
    for raw in days {
        let shaped = day_date(raw).and_then(|date| shape_day(raw, date));
        match shaped {
            Some(day) if daily.last().is_none_or(|prev| day.date > prev.date) => daily.push(day),
            _ => {
                debug!(date = ?raw.date, "dropping forecast day");
                diagnostics.dropped_days += 1;
            }
        }
    }

    Ok(WeatherSnapshot {
        location: shape_location(payload.location.as_ref()),
        current: payload.current.as_ref().map(shape_current),
        hourly,
        daily,
        diagnostics,
    })
}

/// Offset of the location's local clock, used for hour strings without an
/// epoch. Derived from `localtime` against `localtime_epoch` and rounded to a
/// quarter hour, since `localtime` carries no seconds. UTC when unknown.
fn utc_offset(location: Option<&RawLocation>) -> FixedOffset {
    let derived = location.and_then(|l| {
        let epoch = l.localtime_epoch?;
        let local =
            NaiveDateTime::parse_from_str(l.localtime.as_deref()?.trim(), TIME_FORMAT).ok()?;
        let diff = local.and_utc().timestamp() - epoch;
        let rounded =
            (diff + QUARTER_HOUR_SECS / 2).div_euclid(QUARTER_HOUR_SECS) * QUARTER_HOUR_SECS;
        FixedOffset::east_opt(i32::try_from(rounded).ok()?)
    });
    derived.unwrap_or_else(|| Utc.fix())
}

fn hour_timestamp(raw: &RawHour, offset: FixedOffset) -> Option<i64> {
    if let Some(secs) = raw.time_epoch {
        return secs.checked_mul(1000);
    }
    let naive = NaiveDateTime::parse_from_str(raw.time.as_deref()?.trim(), TIME_FORMAT).ok()?;
    naive.and_local_timezone(offset).single().map(|dt| dt.timestamp_millis())
}

fn day_date(raw: &RawForecastDay) -> Option<NaiveDate> {
    let parsed =
        raw.date.as_deref().and_then(|d| NaiveDate::parse_from_str(d.trim(), DATE_FORMAT).ok());
    if parsed.is_some() {
        return parsed;
    }
    DateTime::from_timestamp(raw.date_epoch?, 0).map(|dt| dt.date_naive())
}

fn shape_location(raw: Option<&RawLocation>) -> Location {
    let Some(raw) = raw else {
        return Location::default();
    };
    Location {
        name: raw.name.clone().unwrap_or_default(),
        region: raw.region.clone().filter(|r| !r.is_empty()),
        country: raw.country.clone().unwrap_or_default(),
        latitude: finite(raw.lat),
        longitude: finite(raw.lon),
        timezone: raw.tz_id.clone(),
    }
}

fn shape_current(raw: &RawCurrent) -> CurrentConditions {
    CurrentConditions {
        observed_at: raw.last_updated_epoch.and_then(|s| s.checked_mul(1000)),
        temperature: pair(raw.temp_c, Temperature::from_celsius),
        feels_like: pair(raw.feelslike_c, Temperature::from_celsius),
        wind: shape_wind(raw.wind_kph, raw.wind_degree, raw.wind_dir.as_deref()),
        humidity: percent(raw.humidity),
        pressure_mb: finite(raw.pressure_mb),
        precipitation: pair(raw.precip_mm, Precipitation::from_mm),
        visibility: pair(raw.vis_km, Distance::from_km),
        cloud: percent(raw.cloud),
        condition: shape_condition(raw.condition.as_ref()),
        uv: finite(raw.uv),
        air_quality: raw.air_quality.as_ref().map(shape_air_quality),
    }
}

fn shape_hour(raw: &RawHour, timestamp: i64) -> HourlyRecord {
    HourlyRecord {
        timestamp,
        temperature: pair(raw.temp_c, Temperature::from_celsius),
        feels_like: pair(raw.feelslike_c, Temperature::from_celsius),
        wind: shape_wind(raw.wind_kph, raw.wind_degree, raw.wind_dir.as_deref()),
        humidity: percent(raw.humidity),
        precipitation: pair(raw.precip_mm, Precipitation::from_mm),
        visibility: pair(raw.vis_km, Distance::from_km),
        chance_of_rain: percent(raw.chance_of_rain),
        cloud: percent(raw.cloud),
        condition: shape_condition(raw.condition.as_ref()),
        uv: finite(raw.uv),
    }
}

fn shape_day(raw: &RawForecastDay, date: NaiveDate) -> Option<DailyRecord> {
    let day = raw.day.as_ref()?;
    Some(DailyRecord {
        date,
        min_temperature: pair(day.mintemp_c, Temperature::from_celsius),
        max_temperature: pair(day.maxtemp_c, Temperature::from_celsius),
        max_wind: pair(day.maxwind_kph, Speed::from_kph),
        avg_humidity: finite(day.avghumidity),
        total_precipitation: pair(day.totalprecip_mm, Precipitation::from_mm),
        avg_visibility: pair(day.avgvis_km, Distance::from_km),
        chance_of_rain: percent(day.daily_chance_of_rain),
        condition: shape_condition(day.condition.as_ref()),
        uv: finite(day.uv),
    })
}

fn shape_wind(kph: Option<f64>, degree: Option<f64>, label: Option<&str>) -> Wind {
    let angle = match (finite(degree), label) {
        (Some(deg), _) if deg >= 0.0 => {
            Some(wind_direction_to_angle(WindDirection::Degrees(deg.round() as u16)))
        }
        (_, Some(label)) => Some(wind_direction_to_angle(label)),
        _ => None,
    };
    Wind { speed: pair(kph, Speed::from_kph), angle, label: label.map(str::to_string) }
}

fn shape_condition(raw: Option<&RawCondition>) -> Condition {
    let text = raw.and_then(|c| c.text.clone());
    Condition {
        icon: normalize_condition(text.as_deref()),
        icon_url: raw.and_then(|c| c.icon.as_deref()).map(https_icon_url),
        text,
    }
}

fn shape_air_quality(raw: &RawAirQuality) -> AirQuality {
    let index = small_index(raw.us_epa_index);
    AirQuality {
        co: finite(raw.co),
        no2: finite(raw.no2),
        o3: finite(raw.o3),
        so2: finite(raw.so2),
        pm2_5: finite(raw.pm2_5),
        pm10: finite(raw.pm10),
        index,
        label: air_quality_index_to_label(index.unwrap_or(0)).to_string(),
        gb_defra_index: small_index(raw.gb_defra_index),
    }
}

fn https_icon_url(icon: &str) -> String {
    match icon.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => icon.to_string(),
    }
}

/// Build a unit pair from a metric value. Non-finite values become `None`.
fn pair<T, F>(value: Option<f64>, build: F) -> Option<T>
where
    F: FnOnce(f64) -> Result<T, ShapeError>,
{
    match build(value?) {
        Ok(pair) => Some(pair),
        Err(err) => {
            debug!(%err, "dropping value");
            None
        }
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn percent(value: Option<f64>) -> Option<u8> {
    finite(value).map(|v| v.round().clamp(0.0, 100.0) as u8)
}

fn small_index(value: Option<f64>) -> Option<u8> {
    finite(value).filter(|v| (0.0..=255.0).contains(v)).map(|v| v.round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        condition::IconKey,
        units::{SpeedUnit, TemperatureUnit},
    };
    use chrono::TimeZone;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> RawPayload {
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> RawPayload {
        payload(json!({
            "location": {
                "name": "Madrid", "region": "Madrid", "country": "Spain",
                "lat": 40.4, "lon": -3.68, "tz_id": "Europe/Madrid",
                "localtime_epoch": 1714570200, "localtime": "2024-05-01 15:30"
            },
            "current": {
                "last_updated_epoch": 1714569300,
                "temp_c": 23.4, "temp_f": 74.1, "feelslike_c": 22.0,
                "wind_kph": 14.4, "wind_mph": 8.9, "wind_degree": 250, "wind_dir": "WSW",
                "humidity": 38, "cloud": 25, "precip_mm": 0.0, "vis_km": 10.0, "uv": 6.0,
                "condition": { "text": "Partly cloudy", "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png", "code": 1003 },
                "air_quality": { "co": 230.3, "pm2_5": 4.5, "us-epa-index": 1, "gb-defra-index": 1 }
            },
            "forecast": { "forecastday": [
                {
                    "date": "2024-05-01",
                    "day": {
                        "maxtemp_c": 25.1, "mintemp_c": 11.3, "maxwind_kph": 18.0,
                        "totalprecip_mm": 1.2, "avghumidity": 45, "daily_chance_of_rain": 20,
                        "uv": 7.0, "condition": { "text": "Patchy rain possible" }
                    },
                    "hour": [
                        { "time_epoch": 1714568400, "time": "2024-05-01 15:00", "temp_c": 23.0, "wind_kph": 12.0, "condition": { "text": "Sunny" } },
                        { "time_epoch": 1714572000, "time": "2024-05-01 16:00", "temp_c": 23.6, "wind_kph": 13.1, "condition": { "text": "Sunny" } }
                    ]
                },
                {
                    "date": "2024-05-02",
                    "day": { "maxtemp_c": 19.0, "mintemp_c": 9.5, "condition": { "text": "Moderate rain" } },
                    "hour": [
                        { "time_epoch": 1714600800, "temp_c": 14.2, "wind_kph": 9.0, "condition": { "text": "Light drizzle" } }
                    ]
                }
            ]}
        }))
    }

    #[test]
    fn end_to_end_single_hour() {
        let snapshot = shape_forecast(&payload(json!({
            "forecast": { "forecastday": [{
                "date": "2024-05-01",
                "day": {},
                "hour": [{ "time_epoch": 1714561200, "temp_c": 20, "wind_kph": 10, "condition": { "text": "Sunny" } }]
            }]}
        })))
        .unwrap();

        let hour = &snapshot.hourly[0];
        let temp = hour.temperature.unwrap();
        let wind = hour.wind.speed.unwrap();
        assert_eq!(temp.select(TemperatureUnit::Fahrenheit), 68.0);
        assert_eq!(wind.select(SpeedUnit::Mph), 6.0);
        assert_eq!(hour.condition.icon, IconKey::Sunny);
        assert_eq!(hour.timestamp, 1_714_561_200_000);
    }

    #[test]
    fn missing_forecastday_is_invalid_payload() {
        let no_forecast = payload(json!({ "location": { "name": "Nowhere" } }));
        assert!(matches!(shape_forecast(&no_forecast), Err(ShapeError::InvalidPayload(_))));

        let no_days = payload(json!({ "forecast": {} }));
        assert!(matches!(shape_forecast(&no_days), Err(ShapeError::InvalidPayload(_))));

        let empty = payload(json!({ "forecast": { "forecastday": [] } }));
        assert!(matches!(shape_forecast(&empty), Err(ShapeError::InvalidPayload(_))));
    }

    #[test]
    fn days_without_hours_are_invalid_payload() {
        let p = payload(json!({ "forecast": { "forecastday": [{ "date": "2024-05-01", "day": {} }] } }));
        let err = shape_forecast(&p).unwrap_err();
        assert!(err.to_string().contains("hour"));
    }

    #[test]
    fn malformed_json_is_invalid_payload() {
        assert!(matches!(shape_forecast_json("{not json"), Err(ShapeError::InvalidPayload(_))));
        assert!(matches!(shape_forecast_json("42"), Err(ShapeError::InvalidPayload(_))));
        assert!(matches!(
            shape_forecast_value(json!({ "forecast": { "forecastday": "soon" } })),
            Err(ShapeError::InvalidPayload(_))
        ));
    }

    #[test]
    fn shaping_is_deterministic() {
        let raw = sample();
        let a = shape_forecast(&raw).unwrap();
        let b = shape_forecast(&raw).unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn fahrenheit_never_drifts_from_celsius() {
        let snapshot = shape_forecast(&sample()).unwrap();
        assert_eq!(snapshot.hourly.len(), 3);
        for hour in &snapshot.hourly {
            let t = hour.temperature.unwrap();
            assert_eq!(t.fahrenheit, (t.celsius * 9.0 / 5.0 + 32.0).round());
        }
        // The provider's own temp_f (74.1) is not used; the pair is derived.
        let current = snapshot.current.unwrap().temperature.unwrap();
        assert_eq!(current.fahrenheit, 74.0);
    }

    #[test]
    fn hours_flatten_across_days_in_order() {
        let snapshot = shape_forecast(&sample()).unwrap();
        let stamps: Vec<i64> = snapshot.hourly.iter().map(|h| h.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(snapshot.hourly[2].condition.icon, IconKey::Drizzle);
    }

    #[test]
    fn unparsable_and_backwards_hours_are_counted() {
        let snapshot = shape_forecast(&payload(json!({
            "forecast": { "forecastday": [{
                "date": "2024-05-01",
                "day": {},
                "hour": [
                    { "time": "2024-05-01 10:00", "temp_c": 10 },
                    { "time": "not a time", "temp_c": 11 },
                    { "temp_c": 12 },
                    { "time": "2024-05-01 09:00", "temp_c": 13 },
                    { "time": "2024-05-01 10:00", "temp_c": 14 },
                    { "time": "2024-05-01 11:00", "temp_c": 15 }
                ]
            }]}
        })))
        .unwrap();

        assert_eq!(snapshot.hourly.len(), 2);
        assert_eq!(snapshot.diagnostics.dropped_hours, 4);
        assert_eq!(snapshot.diagnostics.dropped_days, 0);
    }

    #[test]
    fn one_mistyped_hour_does_not_reject_the_forecast() {
        let snapshot = shape_forecast_json(
            r#"{"forecast":{"forecastday":[{"date":"2024-05-01","day":{},"hour":[
                {"time_epoch":1714561200,"temp_c":18},
                {"time_epoch":"n/a","temp_c":19},
                {"time_epoch":1714564800.0,"temp_c":20}
            ]}]}}"#,
        )
        .unwrap();

        assert_eq!(snapshot.hourly.len(), 2);
        assert_eq!(snapshot.hourly[1].timestamp, 1714564800000);
        assert_eq!(snapshot.diagnostics.dropped_hours, 1);
    }

    #[test]
    fn hour_text_uses_location_offset() {
        let snapshot = shape_forecast(&payload(json!({
            "location": { "name": "Madrid", "localtime_epoch": 1714570200, "localtime": "2024-05-01 15:30" },
            "forecast": { "forecastday": [{ "date": "2024-05-01", "day": {}, "hour": [{ "time": "2024-05-01 16:00" }] }] }
        })))
        .unwrap();

        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap().timestamp_millis();
        assert_eq!(snapshot.hourly[0].timestamp, expected);
    }

    #[test]
    fn hour_text_without_location_is_utc() {
        let snapshot = shape_forecast(&payload(json!({
            "forecast": { "forecastday": [{ "date": "2024-05-01", "day": {}, "hour": [{ "time": "2024-05-01 16:00" }] }] }
        })))
        .unwrap();

        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 16, 0, 0).unwrap().timestamp_millis();
        assert_eq!(snapshot.hourly[0].timestamp, expected);
    }

    #[test]
    fn missing_fields_stay_absent() {
        let snapshot = shape_forecast(&payload(json!({
            "forecast": { "forecastday": [{ "date": "2024-05-01", "day": {}, "hour": [{ "time_epoch": 0 }] }] }
        })))
        .unwrap();

        let hour = &snapshot.hourly[0];
        assert_eq!(hour.temperature, None);
        assert_eq!(hour.wind.speed, None);
        assert_eq!(hour.wind.angle, None);
        assert_eq!(hour.humidity, None);
        assert_eq!(hour.uv, None);
        assert_eq!(hour.condition.icon, IconKey::Unknown);
        assert!(snapshot.current.is_none());
        assert_eq!(snapshot.location, Location::default());
    }

    #[test]
    fn daily_records_carry_pairs() {
        let snapshot = shape_forecast(&sample()).unwrap();
        assert_eq!(snapshot.daily.len(), 2);

        let today = &snapshot.daily[0];
        assert_eq!(today.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(today.max_temperature.unwrap().fahrenheit, 77.0);
        assert_eq!(today.min_temperature.unwrap().fahrenheit, 52.0);
        assert_eq!(today.max_wind.unwrap().mph, 11.0);
        assert_eq!(today.total_precipitation.unwrap().inches, 0.05);
        assert_eq!(today.chance_of_rain, Some(20));
        assert_eq!(today.condition.icon, IconKey::LightRainShower);

        assert_eq!(snapshot.daily[1].condition.icon, IconKey::Rain);
        assert_eq!(snapshot.daily[1].max_wind, None);
    }

    #[test]
    fn bad_days_are_dropped_not_fatal() {
        let snapshot = shape_forecast(&payload(json!({
            "forecast": { "forecastday": [
                { "date": "2024-05-01", "day": {}, "hour": [] },
                { "date": "someday", "day": {} },
                { "date": "2024-05-02" },
                { "date_epoch": 1714694400, "day": {} }
            ]}
        })))
        .unwrap();

        assert!(snapshot.hourly.is_empty());
        assert_eq!(snapshot.daily.len(), 2);
        assert_eq!(snapshot.daily[1].date, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
        assert_eq!(snapshot.diagnostics.dropped_days, 2);
    }

    #[test]
    fn current_conditions_are_normalized() {
        let snapshot = shape_forecast(&sample()).unwrap();
        assert_eq!(snapshot.location.label(), "Madrid, Spain");

        let current = snapshot.current.unwrap();
        assert_eq!(current.observed_at, Some(1_714_569_300_000));
        assert_eq!(current.wind.angle, Some(250));
        assert_eq!(current.wind.label.as_deref(), Some("WSW"));
        assert_eq!(current.wind.speed.unwrap().mph, 9.0);
        assert_eq!(current.humidity, Some(38));
        assert_eq!(current.condition.icon, IconKey::PartlyCloudy);
        assert_eq!(
            current.condition.icon_url.as_deref(),
            Some("https://cdn.weatherapi.com/weather/64x64/day/116.png")
        );

        let aq = current.air_quality.unwrap();
        assert_eq!(aq.index, Some(1));
        assert_eq!(aq.label, "Good");
        assert_eq!(aq.no2, None);
    }

    #[test]
    fn wind_label_is_used_without_degrees() {
        let wind = shape_wind(Some(5.0), None, Some("SE"));
        assert_eq!(wind.angle, Some(135));

        let wind = shape_wind(None, Some(f64::NAN), Some("nonsense"));
        assert_eq!(wind.angle, Some(0));
    }
}
