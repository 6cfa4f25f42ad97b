//! Temporal value types.
//!
//! TOML has four temporal literal shapes. The three *local* kinds (no zone
//! offset) are represented by the validated value types in this module;
//! offset date-times carry a [`chrono::DateTime<FixedOffset>`] instead and
//! are parsed through [`parse_offset_date_time`].
//!
//! Local values are constructed only through their `FromStr` factories,
//! which enforce the format and the component ranges:
//!
//! - year `0..=9999`, month `1..=12`, day `1..=31`
//! - hour `< 24`, minute `< 60`, second `< 60`
//!
//! The day check is a plain range check; `2024-02-30` is accepted. Calendar
//! and leap-year rules are intentionally not applied to local dates.
//!
//! ## Examples
//!
//! ```rust
//! use toml_decode::{LocalDate, LocalTime};
//!
//! let date: LocalDate = "1979-05-27".parse().unwrap();
//! assert_eq!((date.year, date.month, date.day), (1979, 5, 27));
//!
//! // Sub-millisecond precision is truncated, not rounded.
//! let time: LocalTime = "07:32:00.999999".parse().unwrap();
//! assert_eq!(time.millisecond, 999);
//!
//! assert!("25:00:00".parse::<LocalTime>().is_err());
//! ```

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::str::FromStr;

fn is_year(value: u16) -> bool {
    value <= 9999
}

fn is_month(value: u8) -> bool {
    (1..=12).contains(&value)
}

fn is_day(value: u8) -> bool {
    (1..=31).contains(&value)
}

fn is_hour(value: u8) -> bool {
    value < 24
}

fn is_minute(value: u8) -> bool {
    value < 60
}

fn is_second(value: u8) -> bool {
    value < 60
}

fn all_ascii_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// A calendar date without a time or zone offset, e.g. `1979-05-27`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl FromStr for LocalDate {
    type Err = Error;

    /// Parses `YYYY-MM-DD`.
    fn from_str(value: &str) -> Result<Self> {
        let invalid = || Error::decode(format!("invalid local date format \"{value}\""));

        let bytes = value.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(invalid());
        }
        let (year, month, day) = (&value[0..4], &value[5..7], &value[8..10]);
        if !all_ascii_digits(year) || !all_ascii_digits(month) || !all_ascii_digits(day) {
            return Err(invalid());
        }

        let year: u16 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let day: u8 = day.parse().map_err(|_| invalid())?;
        if !is_year(year) || !is_month(month) || !is_day(day) {
            return Err(invalid());
        }

        Ok(LocalDate { year, month, day })
    }
}

impl fmt::Display for LocalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A clock time without a date or zone offset, e.g. `07:32:00.999`.
///
/// Fractional seconds beyond three digits are truncated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl FromStr for LocalTime {
    type Err = Error;

    /// Parses `HH:MM:SS` with an optional `.fraction`.
    fn from_str(value: &str) -> Result<Self> {
        let invalid = || Error::decode(format!("invalid local time format \"{value}\""));

        let bytes = value.as_bytes();
        if bytes.len() < 8 || bytes[2] != b':' || bytes[5] != b':' {
            return Err(invalid());
        }
        let (hour, minute, second) = (&value[0..2], &value[3..5], &value[6..8]);
        if !all_ascii_digits(hour) || !all_ascii_digits(minute) || !all_ascii_digits(second) {
            return Err(invalid());
        }

        // If a value contains greater precision than this type can hold,
        // the extra precision must be truncated, not rounded.
        let millisecond = match value.get(8..) {
            None | Some("") => 0,
            Some(fraction) => {
                let digits = fraction.strip_prefix('.').ok_or_else(invalid)?;
                if !all_ascii_digits(digits) {
                    return Err(invalid());
                }
                let kept = &digits[..digits.len().min(3)];
                kept.parse().map_err(|_| invalid())?
            }
        };

        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        let second: u8 = second.parse().map_err(|_| invalid())?;
        if !is_hour(hour) || !is_minute(minute) || !is_second(second) {
            return Err(invalid());
        }

        Ok(LocalTime {
            hour,
            minute,
            second,
            millisecond,
        })
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.millisecond > 0 {
            write!(f, ".{:03}", self.millisecond)?;
        }
        Ok(())
    }
}

/// A calendar date and clock time without a zone offset, e.g.
/// `1979-05-27T07:32:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalDateTime {
    pub date: LocalDate,
    pub time: LocalTime,
}

impl FromStr for LocalDateTime {
    type Err = Error;

    /// Parses a date and a time joined by `T`, `t`, or a single space.
    ///
    /// RFC 3339 permits the lower-case separator, and its §5.6 note allows
    /// a space for readability; both are accepted here.
    fn from_str(value: &str) -> Result<Self> {
        let invalid = || Error::decode(format!("invalid local date-time format \"{value}\""));

        let (date, time) = value.split_once(['T', 't', ' ']).ok_or_else(invalid)?;
        if time.contains(['T', 't', ' ']) {
            return Err(invalid());
        }

        Ok(LocalDateTime {
            date: date.parse()?,
            time: time.parse()?,
        })
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

/// Parses an offset date-time lexeme such as `1979-05-27T00:32:00-07:00` or
/// `1979-05-27 07:32:00z`.
///
/// The separator is normalized to `T` and a trailing `z` to `Z` before
/// handing the lexeme to chrono's RFC 3339 parser, which also enforces the
/// `±hh:mm` offset shape.
pub(crate) fn parse_offset_date_time(lexeme: &str) -> Result<DateTime<FixedOffset>> {
    let invalid = || Error::decode(format!("invalid offset date-time format \"{lexeme}\""));

    if lexeme.len() < 11 || !lexeme.is_char_boundary(10) {
        return Err(invalid());
    }
    let mut normalized = format!("{}T{}", &lexeme[..10], &lexeme[11..]);
    if normalized.ends_with('z') {
        normalized.pop();
        normalized.push('Z');
    }

    DateTime::parse_from_rfc3339(&normalized).map_err(|_| invalid())
}
