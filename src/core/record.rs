//! The persisted progress record.
//!
//! Fields keep their loosely-typed on-disk form (signed integers, ISO 8601
//! text) so that a damaged record still loads and [`crate::core::validate`]
//! can report what is wrong with it.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Date format used for `last_active_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single user's learning progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressRecord {
    /// Cumulative experience points.
    pub xp: i64,
    /// Completed module identifiers, in completion order.
    pub completed_modules: Vec<String>,
    /// Most recent day with recorded activity (ISO 8601 date).
    pub last_active_date: String,
    /// Consecutive active days ending at `last_active_date`.
    pub streak_days: i64,
    /// Last time the record was persisted (ISO 8601 timestamp).
    pub updated_at: String,
}

impl ProgressRecord {
    /// Create a fresh record for today.
    pub fn new() -> Self {
        Self::new_on(today(), Utc::now())
    }

    /// Create a fresh record with an explicit date and timestamp.
    pub fn new_on(today: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            xp: 0,
            completed_modules: Vec::new(),
            last_active_date: format_date(today),
            streak_days: 0,
            updated_at: format_timestamp(now),
        }
    }

    /// Parse `last_active_date`, if it holds a valid calendar date.
    pub fn last_active(&self) -> Option<NaiveDate> {
        parse_date(&self.last_active_date)
    }

    /// Parse `updated_at`, if it holds a valid timestamp.
    pub fn updated_at_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at)
    }

    /// Whether `module` has been completed.
    pub fn has_completed(&self, module: &str) -> bool {
        self.completed_modules.iter().any(|m| m == module)
    }

    /// Set `updated_at` to the given instant.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        self.updated_at = format_timestamp(now);
    }
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Today's date on the local calendar.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format a timestamp as RFC 3339 with microseconds and an explicit `+00:00` offset.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Parse a `YYYY-MM-DD` calendar date.
///
/// Month and day must be zero-padded.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Parse an ISO 8601 timestamp.
///
/// The date must be `YYYY-MM-DD`. It may stand alone (midnight) or be
/// followed by a single separator character and a time of `HH`, `HH:MM`,
/// `HH:MM:SS` or `HH:MM:SS.fff`. An optional offset follows the time:
/// `Z`, `+HH`, `+HHMM`, `+HH:MM` or `+HH:MM:SS`. Times without an offset are
/// read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let date = parse_date(value.get(..10)?)?;
    let rest = &value[10..];

    let mut chars = rest.chars();
    if chars.next().is_none() {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    let (time, offset) = split_offset(chars.as_str())?;
    let at = date.and_time(parse_time(time)?);

    match offset {
        Some(offset) => at
            .and_local_timezone(offset)
            .single()
            .map(|at| at.with_timezone(&Utc)),
        None => Some(at.and_utc()),
    }
}

fn split_offset(value: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(time) = value.strip_suffix('Z') {
        return Some((time, Some(FixedOffset::east_opt(0)?)));
    }
    match value.find(['+', '-']) {
        Some(i) => Some((&value[..i], Some(parse_offset(&value[i..])?))),
        None => Some((value, None)),
    }
}

fn parse_offset(value: &str) -> Option<FixedOffset> {
    let sign = match value.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let body = &value[1..];
    let colon_at = |i: usize| body.as_bytes().get(i) == Some(&b':');

    let (hours, minutes, seconds) = match body.len() {
        2 => (two_digits(body)?, 0, 0),
        4 => (two_digits(body.get(..2)?)?, two_digits(body.get(2..)?)?, 0),
        5 if colon_at(2) => (two_digits(body.get(..2)?)?, two_digits(body.get(3..)?)?, 0),
        8 if colon_at(2) && colon_at(5) => (
            two_digits(body.get(..2)?)?,
            two_digits(body.get(3..5)?)?,
            two_digits(body.get(6..)?)?,
        ),
        _ => return None,
    };
    if hours >= 24 || minutes >= 60 || seconds >= 60 {
        return None;
    }

    let total = (hours * 3600 + minutes * 60 + seconds) as i32;
    FixedOffset::east_opt(sign * total)
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let (clock, fraction) = match value.split_once(['.', ',']) {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (value, None),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let (hour, minute, second) = match parts.as_slice() {
        [h] => (two_digits(h)?, 0, 0),
        [h, m] => (two_digits(h)?, two_digits(m)?, 0),
        [h, m, s] => (two_digits(h)?, two_digits(m)?, two_digits(s)?),
        _ => return None,
    };

    let nanos = match fraction {
        None => 0,
        Some(digits) if parts.len() == 3 => fraction_nanos(digits)?,
        Some(_) => return None,
    };
    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
}

/// Fractional seconds as nanoseconds; digits past the ninth are dropped.
fn fraction_nanos(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let kept = &digits[..digits.len().min(9)];
    let value: u32 = kept.parse().ok()?;
    Some(value * 10u32.pow(9 - kept.len() as u32))
}

fn two_digits(value: &str) -> Option<u32> {
    if value.len() != 2 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
