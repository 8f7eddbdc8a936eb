//! Cron expression parsing for time patterns.
//!
//! Patterns are written in the common five-field dialect
//! (`minute hour day-of-month month day-of-week`, Sunday as 0 or 7).
//! The `cron` crate expects a leading seconds field and numbers Sunday as 1,
//! so five-field expressions are rewritten before parsing. Six- and
//! seven-field expressions are handed to the `cron` crate unchanged.
//!
//! In a five-field expression that restricts both day-of-month and
//! day-of-week, a day fires when either field matches. The `cron` crate
//! requires both, so such expressions become two schedules, one per day
//! field, and the earlier fire wins. A numeric day-of-week with a step
//! (`1/2`) runs to the end of the week, like `1-7/2`.

use std::str::FromStr;

use chrono::{DateTime, TimeDelta, TimeZone};
use cron::Schedule;

use crate::types::ValidationError;

/// Day names indexed by five-field day number (0 and 7 are both Sunday).
const DAY_NAMES: [&str; 8] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// A parsed cron expression.
///
/// Holds one schedule, or two when day-of-month and day-of-week are
/// alternatives.
#[derive(Debug, Clone)]
pub struct CronSchedule {
    schedules: Vec<Schedule>,
}

/// Parses a cron expression into a schedule.
pub fn parse_schedule(expression: &str) -> Result<CronSchedule, ValidationError> {
    let schedules = normalize(expression)?
        .iter()
        .map(|normalized| {
            Schedule::from_str(normalized).map_err(|e| invalid(expression, e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CronSchedule { schedules })
}

/// Returns the first fire time at or after `instant`.
///
/// Fire times have whole-second resolution, so "at or after" is the first
/// fire strictly after one second before `instant`.
pub fn next_fire_at_or_after<Tz: TimeZone>(
    schedule: &CronSchedule,
    instant: &DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    let from = instant.clone().checked_sub_signed(TimeDelta::seconds(1))?;
    schedule
        .schedules
        .iter()
        .filter_map(|s| s.after(&from).next())
        .min()
}

fn normalize(expression: &str) -> Result<Vec<String>, ValidationError> {
    let fields: Vec<&str> = expression.split_whitespace().collect();
    match fields.as_slice() {
        [] => Err(invalid(expression, "expression is empty")),
        [minute, hour, day_of_month, month, day_of_week] => {
            let day_of_week = translate_day_of_week(day_of_week).ok_or_else(|| {
                invalid(
                    expression,
                    format!("unsupported day-of-week field '{day_of_week}'"),
                )
            })?;
            if is_wildcard(day_of_month) || is_wildcard(&day_of_week) {
                return Ok(vec![format!(
                    "0 {minute} {hour} {day_of_month} {month} {day_of_week}"
                )]);
            }
            Ok(vec![
                format!("0 {minute} {hour} {day_of_month} {month} *"),
                format!("0 {minute} {hour} * {month} {day_of_week}"),
            ])
        }
        _ => Ok(vec![fields.join(" ")]),
    }
}

/// A day field starting with `*` leaves the other day field in charge.
fn is_wildcard(field: &str) -> bool {
    field.starts_with('*') || field == "?"
}

fn invalid(expression: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidCron {
        expression: expression.to_string(),
        reason: reason.into(),
    }
}

/// Rewrites numeric day-of-week values as day names.
///
/// Returns `None` for values the five-field dialect does not allow.
fn translate_day_of_week(field: &str) -> Option<String> {
    let items = field
        .split(',')
        .map(translate_day_item)
        .collect::<Option<Vec<_>>>()?;
    Some(items.join(","))
}

fn translate_day_item(item: &str) -> Option<String> {
    let (base, step) = match item.split_once('/') {
        Some((base, step)) => (base, Some(step.parse::<u8>().ok().filter(|s| *s > 0)?)),
        None => (item, None),
    };
    let step_suffix = step.map(|s| format!("/{s}")).unwrap_or_default();

    if base == "*" || base == "?" {
        return Some(item.to_string());
    }

    if let Some((start, end)) = base.split_once('-') {
        return match (is_numeric(start), is_numeric(end)) {
            (false, false) => Some(item.to_string()),
            (true, true) => translate_day_range(day_number(start)?, day_number(end)?, step),
            _ => None,
        };
    }

    if is_numeric(base) {
        let day = day_number(base)?;
        if step.is_some() {
            return translate_day_range(day, 7, step);
        }
        return Some(format!("{}{step_suffix}", DAY_NAMES[usize::from(day)]));
    }

    Some(item.to_string())
}

fn translate_day_range(start: u8, end: u8, step: Option<u8>) -> Option<String> {
    if start > end {
        return None;
    }
    let step_suffix = step.map(|s| format!("/{s}")).unwrap_or_default();
    // 0-7 covers the week once; 7 only matters when the range starts after Sunday.
    let end = if start == 0 && end == 7 { 6 } else { end };

    if start == end {
        return Some(DAY_NAMES[usize::from(start)].to_string());
    }

    if end == 7 {
        let includes_sunday = step.is_none_or(|s| (7 - start) % s == 0);
        let mut out = if start == 6 {
            "Sat".to_string()
        } else {
            format!("{}-Sat{step_suffix}", DAY_NAMES[usize::from(start)])
        };
        if includes_sunday {
            out.push_str(",Sun");
        }
        return Some(out);
    }

    Some(format!(
        "{}-{}{step_suffix}",
        DAY_NAMES[usize::from(start)],
        DAY_NAMES[usize::from(end)]
    ))
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn day_number(s: &str) -> Option<u8> {
    s.parse::<u8>().ok().filter(|day| *day <= 7)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};

    #[test]
    fn five_field_expression_gains_seconds_and_day_names() {
        assert_eq!(normalize("0 9 * * 1-5").unwrap(), vec!["0 0 9 * * Mon-Fri"]);
        assert_eq!(normalize("*/15 * * * *").unwrap(), vec!["0 */15 * * * *"]);
        assert_eq!(
            normalize("30 18 * * 0,6").unwrap(),
            vec!["0 30 18 * * Sun,Sat"]
        );
        assert_eq!(normalize("0 9 15 * *").unwrap(), vec!["0 0 9 15 * *"]);
        assert_eq!(
            normalize("0 9 */2 * 1").unwrap(),
            vec!["0 0 9 */2 * Mon"]
        );
    }

    #[test]
    fn sunday_as_seven_is_supported() {
        assert_eq!(translate_day_of_week("7").unwrap(), "Sun");
        assert_eq!(translate_day_of_week("5-7").unwrap(), "Fri-Sat,Sun");
        assert_eq!(translate_day_of_week("0-7").unwrap(), "Sun-Sat");
        assert_eq!(translate_day_of_week("1-7/2").unwrap(), "Mon-Sat/2,Sun");
        assert_eq!(translate_day_of_week("2-7/2").unwrap(), "Tue-Sat/2");
    }

    #[test]
    fn stepped_single_day_runs_to_end_of_week() {
        assert_eq!(translate_day_of_week("1/2").unwrap(), "Mon-Sat/2,Sun");
        assert_eq!(translate_day_of_week("2/2").unwrap(), "Tue-Sat/2");
        assert_eq!(translate_day_of_week("0/3").unwrap(), "Sun-Sat/3");
        assert!(parse_schedule("0 9 * * 1/2").is_ok());
        assert!(translate_day_of_week("1/0").is_none());
    }

    #[test]
    fn restricted_day_fields_are_alternatives() {
        assert_eq!(
            normalize("0 9 1 * 1").unwrap(),
            vec!["0 0 9 1 * *", "0 0 9 * * Mon"]
        );

        let schedule = parse_schedule("0 9 1 * 1").unwrap();
        // 2026-03-02 is a Monday; 2026-04-01 a Wednesday.
        let monday_eve = Utc.with_ymd_and_hms(2026, 3, 2, 8, 59, 30).unwrap();
        assert_eq!(
            next_fire_at_or_after(&schedule, &monday_eve),
            Some(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap())
        );
        let month_end = Utc.with_ymd_and_hms(2026, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(
            next_fire_at_or_after(&schedule, &month_end),
            Some(Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn named_days_pass_through() {
        assert_eq!(translate_day_of_week("MON-FRI").unwrap(), "MON-FRI");
    }

    #[test]
    fn out_of_range_days_are_rejected() {
        assert!(translate_day_of_week("8").is_none());
        assert!(translate_day_of_week("5-1").is_none());
        assert!(translate_day_of_week("1-Fri").is_none());
        assert!(parse_schedule("0 9 * * 9").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let err = parse_schedule("not a cron").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCron { .. }));
        assert!(parse_schedule("").is_err());
        assert!(parse_schedule("   ").is_err());
    }

    #[test]
    fn six_field_expressions_are_native() {
        assert!(parse_schedule("0 0 9 * * Mon-Fri").is_ok());
    }

    #[test]
    fn next_fire_includes_the_instant_itself() {
        let schedule = parse_schedule("0 9 * * *").unwrap();
        let nine = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap();
        assert_eq!(next_fire_at_or_after(&schedule, &nine), Some(nine));

        let just_after = Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 1).unwrap();
        let tomorrow = Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).unwrap();
        assert_eq!(next_fire_at_or_after(&schedule, &just_after), Some(tomorrow));
    }

    #[test]
    fn weekday_numbers_follow_sunday_zero() {
        // 2026-03-06 is a Friday, 2026-03-07 a Saturday.
        let schedule = parse_schedule("0 9 * * 1-5").unwrap();
        let friday_eve = Utc.with_ymd_and_hms(2026, 3, 6, 8, 59, 30).unwrap();
        let fire = next_fire_at_or_after(&schedule, &friday_eve).unwrap();
        assert_eq!(fire, Utc.with_ymd_and_hms(2026, 3, 6, 9, 0, 0).unwrap());

        let saturday = Utc.with_ymd_and_hms(2026, 3, 7, 8, 59, 30).unwrap();
        let fire = next_fire_at_or_after(&schedule, &saturday).unwrap();
        assert_eq!(fire, Utc.with_ymd_and_hms(2026, 3, 9, 9, 0, 0).unwrap());
    }
}
