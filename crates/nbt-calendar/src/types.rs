use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A published exchange holiday. The label is provenance only; logic keys on `date`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub label: String,
}

impl HolidayEntry {
    pub fn new<S: Into<String>>(date: NaiveDate, label: S) -> Self {
        Self {
            date,
            label: label.into(),
        }
    }
}

/// The canonical set of trading days for a year range.
///
/// Immutable once built. Rebuild it whenever the holiday source changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TradingCalendar {
    days: BTreeSet<NaiveDate>,
}

impl TradingCalendar {
    /// Wrap an explicit set of trading days (tests, or callers that already hold one).
    pub fn from_dates<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        Self {
            days: dates.into_iter().collect(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Ascending iteration.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().copied()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.days.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }
}

/// Calendar failures that propagate to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CalendarError {
    /// `year_start` is after `year_end`.
    InvalidYearRange { year_start: i32, year_end: i32 },
    /// No trading day found within the bounded lookback: the calendar input is
    /// stale (does not cover the requested range) or corrupt.
    InsufficientCalendarData { from: NaiveDate, lookback_days: u32 },
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::InvalidYearRange {
                year_start,
                year_end,
            } => write!(
                f,
                "invalid year range: start {year_start} is after end {year_end}"
            ),
            CalendarError::InsufficientCalendarData {
                from,
                lookback_days,
            } => write!(
                f,
                "insufficient calendar data: no trading day within {lookback_days} days before {from}"
            ),
        }
    }
}

impl std::error::Error for CalendarError {}
