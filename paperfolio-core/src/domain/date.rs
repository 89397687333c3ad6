//! CalendarDate — validated, immutable calendar date.
//!
//! Every date that enters the engine passes through `CalendarDate::new`, so
//! downstream code never sees a February 30th. Arithmetic (day offsets, day
//! counts) is delegated to `chrono::NaiveDate`; ordering and equality are
//! plain (year, month, day) lexicographic comparison.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Construction and parsing failures for [`CalendarDate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid month: {0}")]
    InvalidMonth(u32),

    #[error("invalid day: {0}")]
    InvalidDay(u32),

    #[error("day {day} is not valid for month {month}")]
    DayOutOfRange { day: u32, month: u32 },

    #[error("February {day} is not valid in {year}")]
    InvalidFebruaryDay { day: u32, year: i32 },

    #[error("invalid year: {0}")]
    InvalidYear(i32),

    #[error("unparseable date '{0}' (expected YYYY-MM-DD)")]
    Unparseable(String),

    #[error("date arithmetic out of range")]
    OutOfRange,
}

/// A validated calendar day.
///
/// Field order matters: the derived `Ord` compares (year, month, day), which
/// is exactly chronological order for valid dates.
///
/// Serializes to and from the canonical `YYYY-MM-DD` string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    /// Builds a date, rejecting anything the Gregorian calendar does not have.
    ///
    /// Years are bounded to 0..=9999 — the range the canonical `YYYY-MM-DD`
    /// form can spell, and comfortably inside what `chrono::NaiveDate`
    /// represents, so date arithmetic never fails on a constructed date.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        if !(1..=12).contains(&month) {
            return Err(DateError::InvalidMonth(month));
        }
        if day < 1 || day > 31 {
            return Err(DateError::InvalidDay(day));
        }
        if !(0..=9999).contains(&year) {
            return Err(DateError::InvalidYear(year));
        }
        let leap = is_leap_year(year);
        if month == 2 && ((leap && day > 29) || (!leap && day > 28)) {
            return Err(DateError::InvalidFebruaryDay { day, year });
        }
        if matches!(month, 4 | 6 | 9 | 11) && day == 31 {
            return Err(DateError::DayOutOfRange { day, month });
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Strictly earlier than `other`.
    pub fn is_before(&self, other: CalendarDate) -> bool {
        *self < other
    }

    /// Strictly later than `other`.
    pub fn is_after(&self, other: CalendarDate) -> bool {
        *self > other
    }

    /// Signed count of calendar days from `self` to `other` (proleptic
    /// Gregorian). Positive when `other` is later.
    pub fn days_between(&self, other: CalendarDate) -> i64 {
        (other.to_naive() - self.to_naive()).num_days()
    }

    /// Offsets by `days` (negative allowed), rolling month, year, and leap
    /// boundaries.
    pub fn add_days(&self, days: i64) -> Result<CalendarDate, DateError> {
        let shifted = self
            .to_naive()
            .checked_add_signed(chrono::Duration::days(days))
            .ok_or(DateError::OutOfRange)?;
        CalendarDate::new(shifted.year(), shifted.month(), shifted.day())
    }

    fn to_naive(self) -> NaiveDate {
        // Construction invariants guarantee a representable date.
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).unwrap()
    }
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || DateError::Unparseable(s.to_string());
        let mut parts = s.splitn(3, '-');
        let year = parts.next().ok_or_else(unparseable)?;
        let month = parts.next().ok_or_else(unparseable)?;
        let day = parts.next().ok_or_else(unparseable)?;
        CalendarDate::new(
            year.parse().map_err(|_| unparseable())?,
            month.parse().map_err(|_| unparseable())?,
            day.parse().map_err(|_| unparseable())?,
        )
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = DateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CalendarDate> for String {
    fn from(d: CalendarDate) -> String {
        d.to_string()
    }
}
