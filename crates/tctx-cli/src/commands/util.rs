//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::{Context, bail};
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime};
use regex::Regex;
use serde_json::{Map, Value};

use crate::zone::Zone;

/// Pre-compiled regexes for relative time parsing.
static PAST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());
static FUTURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^in\s+(\d+)\s+(minute|hour|day|week)s?$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a datetime string as RFC 3339, a naive local time, or relative time.
///
/// Supports:
/// - RFC 3339: "2026-01-15T10:30:00Z" (keeps its own offset)
/// - Naive: "2026-01-15T10:30" or "2026-01-15 10:30:00", read in `zone`
/// - Relative: "2 hours ago", "in 30 minutes", "1 day ago", "in 1 week"
pub fn parse_datetime(
    s: &str,
    zone: Zone,
    now: DateTime<FixedOffset>,
) -> anyhow::Result<DateTime<FixedOffset>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return zone.localize(naive);
        }
    }

    let (caps, sign) = if let Some(caps) = PAST_RE.captures(s) {
        (caps, -1)
    } else if let Some(caps) = FUTURE_RE.captures(s) {
        (caps, 1)
    } else {
        bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z or 2026-01-15T10:30) \
             or relative (e.g., '2 hours ago', 'in 3 days')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    let duration = Duration::minutes(sign * n * minutes_per_unit);
    now.checked_add_signed(duration)
        .context("relative time is out of range")
}

/// Parse a JSON object given on the command line.
pub fn parse_json_object(s: &str, what: &str) -> anyhow::Result<Map<String, Value>> {
    match serde_json::from_str(s).with_context(|| format!("invalid {what} JSON"))? {
        Value::Object(map) => Ok(map),
        other => bail!("{what} must be a JSON object, got: {other}"),
    }
}

/// Timestamp layout shared by the text outputs.
pub fn format_instant(instant: &DateTime<FixedOffset>) -> String {
    instant.format("%Y-%m-%d %H:%M:%S %:z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-03-03T10:00:00+01:00").unwrap()
    }

    fn utc() -> Zone {
        Zone::Named(chrono_tz::UTC)
    }

    #[test]
    fn rfc3339_keeps_offset() {
        let dt = parse_datetime("2026-01-15T10:30:00-05:00", utc(), now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-01-15T10:30:00-05:00");
    }

    #[test]
    fn naive_time_uses_zone() {
        let madrid = Zone::Named(chrono_tz::Europe::Madrid);
        let dt = parse_datetime("2026-01-15T10:30", madrid, now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-01-15T10:30:00+01:00");

        let dt = parse_datetime("2026-07-15 22:15:30", madrid, now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-07-15T22:15:30+02:00");
    }

    #[test]
    fn relative_past_and_future() {
        let dt = parse_datetime("2 hours ago", utc(), now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-03T08:00:00+01:00");

        let dt = parse_datetime("1 minute ago", utc(), now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-03T09:59:00+01:00");

        let dt = parse_datetime("in 3 days", utc(), now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-06T10:00:00+01:00");

        let dt = parse_datetime("in 1 week", utc(), now()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-10T10:00:00+01:00");
    }

    #[test]
    fn rejects_garbage_and_huge_values() {
        let err = parse_datetime("next tuesday", utc(), now()).unwrap_err();
        assert!(err.to_string().contains("Invalid datetime"));

        let err = parse_datetime("99999999 weeks ago", utc(), now()).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn json_object_parsing() {
        let map = parse_json_object(r#"{"mood": "tired"}"#, "data").unwrap();
        assert_eq!(map["mood"], "tired");

        let err = parse_json_object("[1, 2]", "data").unwrap_err();
        assert!(err.to_string().contains("data must be a JSON object"));

        let err = parse_json_object("{oops", "pattern").unwrap_err();
        assert!(err.to_string().contains("invalid pattern JSON"));
    }

    #[test]
    fn instant_format() {
        assert_eq!(format_instant(&now()), "2026-03-03 10:00:00 +01:00");
    }
}
