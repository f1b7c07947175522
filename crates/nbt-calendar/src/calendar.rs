//! Trading-day set construction.
//!
//! # Design
//!
//! The canonical trading-day set for an inclusive year range is
//! `(all Monday–Friday dates) − (holiday dates)`. Pure function of its inputs:
//! no hardcoded holiday tables, no wall clock.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::types::{CalendarError, HolidayEntry, TradingCalendar};

// ---------------------------------------------------------------------------
// Holiday inputs
// ---------------------------------------------------------------------------

/// Collapse holiday entries to their date set. Duplicate dates (the upstream list
/// is append-only) collapse to one member.
pub fn holiday_dates<'a, I>(entries: I) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a HolidayEntry>,
{
    entries.into_iter().map(|e| e.date).collect()
}

/// Parse ISO `YYYY-MM-DD` holiday strings.
///
/// Unparseable strings should have been filtered upstream; any that reach this
/// point are skipped (logged), never fatal.
pub fn parse_holiday_dates<'a, I>(raw: I) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = BTreeSet::new();
    for s in raw {
        match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
            Ok(d) => {
                out.insert(d);
            }
            Err(_) => warn!(raw = s, "skipping holiday with invalid date format"),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Trading days
// ---------------------------------------------------------------------------

/// Build the trading-day set for `year_start..=year_end`.
///
/// A date that is both a weekend day and a listed holiday is simply absent;
/// holidays outside the range have no effect.
pub fn build_trading_days(
    holidays: &BTreeSet<NaiveDate>,
    year_start: i32,
    year_end: i32,
) -> Result<TradingCalendar, CalendarError> {
    let bad_range = CalendarError::InvalidYearRange {
        year_start,
        year_end,
    };
    if year_start > year_end {
        return Err(bad_range);
    }
    let first = NaiveDate::from_ymd_opt(year_start, 1, 1).ok_or_else(|| bad_range.clone())?;
    let last = NaiveDate::from_ymd_opt(year_end, 12, 31).ok_or(bad_range)?;

    let days = first
        .iter_days()
        .take_while(|d| *d <= last)
        .filter(|d| is_weekday(*d))
        .filter(|d| !holidays.contains(d));

    Ok(TradingCalendar::from_dates(days))
}

/// ISO weekday 1–5.
fn is_weekday(d: NaiveDate) -> bool {
    d.weekday().number_from_monday() <= 5
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
