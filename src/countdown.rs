//! Date arithmetic behind the countdown cards.
//!
//! The month/day/hour/minute breakdown treats every month as 30 days. It is
//! meant for a friendly caption, not for calendar accuracy.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use thiserror::Error;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;
const SECS_PER_MONTH: i64 = 30 * SECS_PER_DAY;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Countdown<T> {
    TimeUp,
    Remaining(T),
}

impl<T: fmt::Display> fmt::Display for Countdown<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeUp => write!(f, "Time is up!"),
            Self::Remaining(value) => value.fmt(f),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Breakdown {
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Months {} Days {} Hours {} Minutes",
            self.months, self.days, self.hours, self.minutes
        )
    }
}

pub fn breakdown(target: DateTime<Utc>, now: DateTime<Utc>) -> Countdown<Breakdown> {
    if target <= now {
        return Countdown::TimeUp;
    }

    let secs = (target - now).num_seconds();
    Countdown::Remaining(Breakdown {
        months: secs / SECS_PER_MONTH,
        days: secs % SECS_PER_MONTH / SECS_PER_DAY,
        hours: secs % SECS_PER_DAY / SECS_PER_HOUR,
        minutes: secs % SECS_PER_HOUR / SECS_PER_MINUTE,
    })
}

pub fn days_left(target: DateTime<Utc>, now: DateTime<Utc>) -> Countdown<i64> {
    if target <= now {
        return Countdown::TimeUp;
    }
    Countdown::Remaining((target - now).num_days())
}

/// Formats as `3 May 2026`.
pub fn format_long_date(date: DateTime<Utc>) -> String {
    date.format("%-d %B %Y").to_string()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateParseError {
    #[error("expected format dd-mm-yyyy, got '{0}'")]
    Format(String),
    #[error("'{0}' is not a valid calendar date")]
    InvalidDate(String),
}

/// Parses a strict `dd-mm-yyyy` date into midnight UTC.
pub fn parse_date(input: impl AsRef<str>) -> Result<DateTime<Utc>, DateParseError> {
    let input = input.as_ref().trim();

    let bytes = input.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(DateParseError::Format(input.into()));
    }

    let field = |range: std::ops::Range<usize>| {
        input[range]
            .parse::<u32>()
            .map_err(|_| DateParseError::Format(input.into()))
    };
    let (day, month, year) = (field(0..2)?, field(3..5)?, field(6..10)?);

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| DateParseError::InvalidDate(input.into()))
}
