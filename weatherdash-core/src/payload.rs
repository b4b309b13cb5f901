//! Serde mirror of the WeatherAPI.com forecast response.
//!
//! Every field is optional. Numbers are read as `f64` even where the provider
//! usually sends integers, so a `55.0` humidity does not reject the whole
//! payload. Epoch fields accept integral floats, and `hour` elements that fit
//! nowhere are kept as raw JSON for the shaper to count and skip.

use serde::{Deserialize, Deserializer, Serialize, de};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPayload {
    pub location: Option<RawLocation>,
    pub current: Option<RawCurrent>,
    pub forecast: Option<RawForecast>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    pub name: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub tz_id: Option<String>,
    #[serde(default, deserialize_with = "epoch_seconds")]
    pub localtime_epoch: Option<i64>,
    pub localtime: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCondition {
    pub text: Option<String>,
    pub icon: Option<String>,
    pub code: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAirQuality {
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub so2: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    #[serde(rename = "us-epa-index")]
    pub us_epa_index: Option<f64>,
    #[serde(rename = "gb-defra-index")]
    pub gb_defra_index: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCurrent {
    #[serde(default, deserialize_with = "epoch_seconds")]
    pub last_updated_epoch: Option<i64>,
    pub temp_c: Option<f64>,
    pub temp_f: Option<f64>,
    pub feelslike_c: Option<f64>,
    pub feelslike_f: Option<f64>,
    pub wind_kph: Option<f64>,
    pub wind_mph: Option<f64>,
    pub wind_degree: Option<f64>,
    pub wind_dir: Option<String>,
    pub pressure_mb: Option<f64>,
    pub precip_mm: Option<f64>,
    pub precip_in: Option<f64>,
    pub humidity: Option<f64>,
    pub cloud: Option<f64>,
    pub vis_km: Option<f64>,
    pub vis_miles: Option<f64>,
    pub uv: Option<f64>,
    pub condition: Option<RawCondition>,
    pub air_quality: Option<RawAirQuality>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecast {
    pub forecastday: Option<Vec<RawForecastDay>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecastDay {
    pub date: Option<String>,
    #[serde(default, deserialize_with = "epoch_seconds")]
    pub date_epoch: Option<i64>,
    pub day: Option<RawDay>,
    pub hour: Option<Vec<HourEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDay {
    pub maxtemp_c: Option<f64>,
    pub maxtemp_f: Option<f64>,
    pub mintemp_c: Option<f64>,
    pub mintemp_f: Option<f64>,
    pub maxwind_kph: Option<f64>,
    pub maxwind_mph: Option<f64>,
    pub totalprecip_mm: Option<f64>,
    pub totalprecip_in: Option<f64>,
    pub avgvis_km: Option<f64>,
    pub avgvis_miles: Option<f64>,
    pub avghumidity: Option<f64>,
    pub daily_chance_of_rain: Option<f64>,
    pub uv: Option<f64>,
    pub condition: Option<RawCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHour {
    #[serde(default, deserialize_with = "epoch_seconds")]
    pub time_epoch: Option<i64>,
    pub time: Option<String>,
    pub temp_c: Option<f64>,
    pub temp_f: Option<f64>,
    pub feelslike_c: Option<f64>,
    pub feelslike_f: Option<f64>,
    pub wind_kph: Option<f64>,
    pub wind_mph: Option<f64>,
    pub wind_degree: Option<f64>,
    pub wind_dir: Option<String>,
    pub pressure_mb: Option<f64>,
    pub precip_mm: Option<f64>,
    pub precip_in: Option<f64>,
    pub humidity: Option<f64>,
    pub cloud: Option<f64>,
    pub chance_of_rain: Option<f64>,
    pub vis_km: Option<f64>,
    pub vis_miles: Option<f64>,
    pub uv: Option<f64>,
    pub condition: Option<RawCondition>,
}

/// One element of a day's `hour` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HourEntry {
    Hour(Box<RawHour>),
    /// An element that is not a readable hour, e.g. `{"time_epoch": "n/a"}`.
    Malformed(serde_json::Value),
}

impl HourEntry {
    pub fn hour(&self) -> Option<&RawHour> {
        match self {
            HourEntry::Hour(hour) => Some(hour),
            HourEntry::Malformed(_) => None,
        }
    }
}

/// Epoch seconds sent either as an integer or as an integral float.
fn epoch_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(secs) = number.as_i64() {
        return Ok(Some(secs));
    }
    match number.as_f64() {
        Some(secs) if secs.fract() == 0.0 && secs.abs() < i64::MAX as f64 => Ok(Some(secs as i64)),
        _ => Err(de::Error::custom(format!("invalid epoch seconds: {number}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_hour() {
        let hour: RawHour = serde_json::from_str(
            r#"{"time":"2024-05-01 13:00","temp_c":20,"condition":{"text":"Sunny"}}"#,
        )
        .unwrap();
        assert_eq!(hour.temp_c, Some(20.0));
        assert_eq!(hour.time_epoch, None);
        assert_eq!(hour.condition.and_then(|c| c.text).as_deref(), Some("Sunny"));
    }

    #[test]
    fn epoch_accepts_integral_floats() {
        let hour: RawHour = serde_json::from_str(r#"{"time_epoch":1714561200.0}"#).unwrap();
        assert_eq!(hour.time_epoch, Some(1714561200));

        assert!(serde_json::from_str::<RawHour>(r#"{"time_epoch":1714561200.5}"#).is_err());
        assert!(serde_json::from_str::<RawHour>(r#"{"time_epoch":"n/a"}"#).is_err());
    }

    #[test]
    fn unreadable_hour_entries_are_kept_aside() {
        let day: RawForecastDay = serde_json::from_str(
            r#"{"date":"2024-05-01","hour":[{"time_epoch":1714561200},{"time_epoch":"n/a"},7]}"#,
        )
        .unwrap();
        let hours = day.hour.unwrap();

        assert_eq!(hours.len(), 3);
        assert_eq!(hours[0].hour().and_then(|h| h.time_epoch), Some(1714561200));
        assert!(hours[1].hour().is_none());
        assert!(matches!(hours[2], HourEntry::Malformed(_)));
    }

    #[test]
    fn air_quality_uses_hyphenated_index_names() {
        let aq: RawAirQuality =
            serde_json::from_str(r#"{"pm2_5":4.2,"us-epa-index":2,"gb-defra-index":1}"#).unwrap();
        assert_eq!(aq.us_epa_index, Some(2.0));
        assert_eq!(aq.gb_defra_index, Some(1.0));
        assert_eq!(aq.pm2_5, Some(4.2));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let payload: RawPayload =
            serde_json::from_str(r#"{"alerts":{"alert":[]},"forecast":{"forecastday":[]}}"#)
                .unwrap();
        assert!(payload.location.is_none());
        assert_eq!(payload.forecast.and_then(|f| f.forecastday).map(|d| d.len()), Some(0));
    }
}
