//! Declarative time patterns and the matcher that evaluates them.
//!
//! A [`TimePattern`] is a conjunction of optional restrictions. Each populated
//! field must match for the pattern to match; a pattern with no populated
//! fields matches every instant.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::cron_expr;
use crate::types::ValidationError;

/// Maximum distance between an instant and the next cron fire for a match.
const CRON_MATCH_TOLERANCE_SECS: i64 = 60;

/// Day abbreviations indexed by day number (0 = Sunday).
const DAY_ABBREVIATIONS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A declarative schedule specification.
///
/// Empty lists are treated the same as absent fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePattern {
    /// Days of the week, 0 = Sunday through 6 = Saturday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,

    /// Exact hours of the day (0-23).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<Vec<u8>>,

    /// Inclusive hour interval `[start, end]`; does not wrap past midnight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_range: Option<(u8, u8)>,

    /// Calendar dates on which the pattern applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_dates: Option<Vec<NaiveDate>>,

    /// Cron expression; matches during the minute before each fire time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron_pattern: Option<String>,
}

impl TimePattern {
    /// Returns `true` if no field restricts the pattern.
    pub fn is_always(&self) -> bool {
        populated(self.days_of_week.as_ref()).is_none()
            && populated(self.hours.as_ref()).is_none()
            && self.hour_range.is_none()
            && populated(self.specific_dates.as_ref()).is_none()
            && self.cron_pattern.is_none()
    }

    /// Checks field ranges and the cron expression.
    ///
    /// The matcher never validates; this is for construction time.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for &value in self.days_of_week.iter().flatten() {
            if value > 6 {
                return Err(ValidationError::DayOutOfRange { value });
            }
        }
        for &value in self.hours.iter().flatten() {
            if value > 23 {
                return Err(ValidationError::HourOutOfRange { value });
            }
        }
        if let Some((start, end)) = self.hour_range {
            for value in [start, end] {
                if value > 23 {
                    return Err(ValidationError::HourOutOfRange { value });
                }
            }
            if start > end {
                return Err(ValidationError::InvertedHourRange { start, end });
            }
        }
        if let Some(expression) = &self.cron_pattern {
            cron_expr::parse_schedule(expression)?;
        }
        Ok(())
    }

    /// Returns `true` if `instant` satisfies every populated field.
    ///
    /// Day, hour and date are read in the instant's own time zone.
    /// A malformed cron expression never matches.
    pub fn matches<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        if let Some(days) = populated(self.days_of_week.as_ref()) {
            let day = instant.weekday().num_days_from_sunday();
            if !days.iter().any(|&d| u32::from(d) == day) {
                return false;
            }
        }

        let hour = instant.hour();

        if let Some(hours) = populated(self.hours.as_ref()) {
            if !hours.iter().any(|&h| u32::from(h) == hour) {
                return false;
            }
        }

        if let Some((start, end)) = self.hour_range {
            if hour < u32::from(start) || hour > u32::from(end) {
                return false;
            }
        }

        if let Some(dates) = populated(self.specific_dates.as_ref()) {
            if !dates.contains(&instant.date_naive()) {
                return false;
            }
        }

        if let Some(expression) = &self.cron_pattern {
            return cron_fires_near(expression, instant);
        }

        true
    }
}

/// Free-function form of [`TimePattern::matches`].
pub fn matches<Tz: TimeZone>(pattern: &TimePattern, instant: &DateTime<Tz>) -> bool {
    pattern.matches(instant)
}

fn populated<T>(values: Option<&Vec<T>>) -> Option<&Vec<T>> {
    values.filter(|v| !v.is_empty())
}

fn cron_fires_near<Tz: TimeZone>(expression: &str, instant: &DateTime<Tz>) -> bool {
    let schedule = match cron_expr::parse_schedule(expression) {
        Ok(schedule) => schedule,
        Err(e) => {
            tracing::warn!(error = %e, "cron pattern never matches");
            return false;
        }
    };

    cron_expr::next_fire_at_or_after(&schedule, instant).is_some_and(|next| {
        next.signed_duration_since(instant).abs() < TimeDelta::seconds(CRON_MATCH_TOLERANCE_SECS)
    })
}

impl fmt::Display for TimePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(days) = populated(self.days_of_week.as_ref()) {
            let names: Vec<&str> = days
                .iter()
                .map(|&d| DAY_ABBREVIATIONS.get(usize::from(d)).copied().unwrap_or("?"))
                .collect();
            parts.push(format!("Days: {}", names.join(", ")));
        }

        if let Some((start, end)) = self.hour_range {
            parts.push(format!("Schedule: {start:02}:00-{end:02}:00"));
        }

        if let Some(hours) = populated(self.hours.as_ref()) {
            let hours: Vec<String> = hours.iter().map(|h| format!("{h:02}:00")).collect();
            parts.push(format!("Hours: {}", hours.join(", ")));
        }

        if let Some(dates) = populated(self.specific_dates.as_ref()) {
            let dates: Vec<String> = dates.iter().map(ToString::to_string).collect();
            parts.push(format!("Dates: {}", dates.join(", ")));
        }

        if let Some(expression) = &self.cron_pattern {
            parts.push(format!("Cron: {expression}"));
        }

        if parts.is_empty() {
            write!(f, "Always active")
        } else {
            write!(f, "{}", parts.join(" | "))
        }
    }
}
