//! Time zone used to read the clock and interpret naive times.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Either the machine's local zone or a named IANA zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Local,
    Named(Tz),
}

impl FromStr for Zone {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        s.parse::<Tz>().map(Self::Named).map_err(|_| {
            anyhow::anyhow!(
                "unknown time zone: {s} (expected an IANA name such as Europe/Madrid, or 'local')"
            )
        })
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => match iana_time_zone::get_timezone() {
                Ok(name) => write!(f, "{name} (local)"),
                Err(_) => f.write_str("local"),
            },
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl Zone {
    /// Current wall-clock time in this zone.
    pub fn now(self) -> DateTime<FixedOffset> {
        self.convert(Utc::now())
    }

    pub fn convert(self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Local => instant.with_timezone(&Local).fixed_offset(),
            Self::Named(tz) => instant.with_timezone(&tz).fixed_offset(),
        }
    }

    /// Interprets a wall-clock time in this zone.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant.
    /// Times skipped by a DST jump are rejected.
    pub fn localize(self, naive: NaiveDateTime) -> Result<DateTime<FixedOffset>> {
        let resolved = match self {
            Self::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            Self::Named(tz) => tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
        };
        resolved.with_context(|| format!("{naive} does not exist in time zone {self}"))
    }
}
