//! Picking which hourly records to show.
//!
//! Kept apart from shaping: shaping is clock-free, while windowing is
//! relative to "now", which the caller supplies.

use chrono::{DateTime, Utc};

use crate::model::HourlyRecord;

pub const DEFAULT_WINDOW_HOURS: usize = 24;

const HOUR_MILLIS: i64 = 60 * 60 * 1000;

/// Records from the start of the hour containing `now_millis` onward, at most
/// `limit` of them. Relies on timestamps being strictly increasing, which the
/// shaper guarantees.
pub fn upcoming_hours(hourly: &[HourlyRecord], now_millis: i64, limit: usize) -> &[HourlyRecord] {
    let hour_start = now_millis - now_millis.rem_euclid(HOUR_MILLIS);
    let first = hourly.partition_point(|h| h.timestamp < hour_start);
    let rest = &hourly[first..];
    &rest[..rest.len().min(limit)]
}

/// [`upcoming_hours`] for a wall-clock instant with the default 24-hour cap.
pub fn next_day(hourly: &[HourlyRecord], now: DateTime<Utc>) -> &[HourlyRecord] {
    upcoming_hours(hourly, now.timestamp_millis(), DEFAULT_WINDOW_HOURS)
}
