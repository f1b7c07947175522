//! Reference-date resolution against a [`TradingCalendar`].
//!
//! Both entry points share one rule: a trading session counts as closed (its
//! data final) once the time of day reaches `cutoff_hour:00:00`. Every walk is
//! bounded so a stale or empty calendar can never loop forever.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use crate::types::{CalendarError, TradingCalendar};

/// Maximum number of calendar days [`resolve_effective_date`] steps back.
pub const EFFECTIVE_DATE_MAX_LOOKBACK_DAYS: u32 = 90;

/// [`previous_n_trading_days`] inspects at most `n * WINDOW_LOOKBACK_FACTOR`
/// calendar days.
pub const WINDOW_LOOKBACK_FACTOR: usize = 3;

/// `true` once `now` is at or after `cutoff_hour:00:00`. A cutoff of 24 or more
/// never closes the day.
fn is_past_cutoff(now: NaiveDateTime, cutoff_hour: u32) -> bool {
    NaiveTime::from_hms_opt(cutoff_hour, 0, 0).is_some_and(|cutoff| now.time() >= cutoff)
}

/// Resolve the trading day a report is "as of".
///
/// - Today, if today is a trading day and `now` is past the cutoff.
/// - Otherwise the most recent trading day strictly before today.
///
/// Never returns a non-trading day. Fails with
/// [`CalendarError::InsufficientCalendarData`] when nothing is found within
/// [`EFFECTIVE_DATE_MAX_LOOKBACK_DAYS`].
pub fn resolve_effective_date(
    calendar: &TradingCalendar,
    now: NaiveDateTime,
    cutoff_hour: u32,
) -> Result<NaiveDate, CalendarError> {
    let today = now.date();
    if calendar.contains(today) && is_past_cutoff(now, cutoff_hour) {
        return Ok(today);
    }

    let insufficient = CalendarError::InsufficientCalendarData {
        from: today,
        lookback_days: EFFECTIVE_DATE_MAX_LOOKBACK_DAYS,
    };

    let mut d = today;
    for _ in 0..EFFECTIVE_DATE_MAX_LOOKBACK_DAYS {
        d = match d.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
        if calendar.contains(d) {
            return Ok(d);
        }
    }

    Err(insufficient)
}

/// Collect up to `n` trading days ending at (or just before) `anchor`, ordered
/// oldest to newest.
///
/// The search starts at `anchor`'s date when past the cutoff, otherwise at the
/// day before, and walks backward one calendar day at a time. At most
/// `n * WINDOW_LOOKBACK_FACTOR` calendar days are inspected (the start day counts);
/// if fewer than `n` trading days turn up the partial list is returned.
pub fn previous_n_trading_days(
    calendar: &TradingCalendar,
    anchor: NaiveDateTime,
    n: usize,
    cutoff_hour: u32,
) -> Vec<NaiveDate> {
    if n == 0 {
        return Vec::new();
    }

    let start = if is_past_cutoff(anchor, cutoff_hour) {
        Some(anchor.date())
    } else {
        anchor.date().pred_opt()
    };

    let max_lookback = n.saturating_mul(WINDOW_LOOKBACK_FACTOR);
    let mut acc: Vec<NaiveDate> = Vec::with_capacity(n);
    let mut cursor = start;
    let mut inspected = 0usize;

    while let Some(d) = cursor {
        if acc.len() == n || inspected == max_lookback {
            break;
        }
        if calendar.contains(d) {
            acc.push(d);
        }
        inspected += 1;
        cursor = d.pred_opt();
    }

    if acc.len() < n {
        warn!(
            anchor = %anchor,
            requested = n,
            found = acc.len(),
            max_lookback,
            "trading-day window is short"
        );
    }

    acc.reverse();
    acc
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
