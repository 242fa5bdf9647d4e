// src/utils/time.rs

//! Timestamp normalization.
//!
//! Providers report times as epoch milliseconds or as assorted date strings.
//! Everything is normalized to ISO-8601 UTC with millisecond precision.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Format a UTC instant as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub fn format_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a date string in any of the supported shapes.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

/// Normalize a raw JSON timestamp (epoch millis or string) to ISO-8601.
///
/// Unparseable or missing values become `None`.
pub fn normalize_timestamp(value: Option<&Value>) -> Option<String> {
    let dt = match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::String(s) => parse_datetime(s),
        _ => None,
    };
    dt.map(format_iso)
}

/// Whole days elapsed between `posted` and `now`; negative for future dates.
pub fn age_in_days(posted: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - posted).num_milliseconds() as f64 / 86_400_000.0
}
