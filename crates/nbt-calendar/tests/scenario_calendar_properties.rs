//! Trading calendar invariants over generated holiday sets and clocks.
//!
//! GREEN when:
//! - `build_trading_days` never yields a weekend day or a listed holiday.
//! - `resolve_effective_date` is repeatable and always lands on a member.
//! - `previous_n_trading_days` is strictly ascending, bounded by `n`, members only.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use nbt_calendar::*;
use proptest::prelude::*;

fn day_of(year: i32, ordinal: u32) -> NaiveDate {
    NaiveDate::from_yo_opt(year, ordinal).unwrap()
}

fn holiday_set(year: i32, ordinals: &[u32]) -> BTreeSet<NaiveDate> {
    ordinals.iter().map(|o| day_of(year, *o)).collect()
}

proptest! {
    #[test]
    fn built_calendar_has_no_weekends_or_holidays(
        year in 2000i32..2040,
        ordinals in proptest::collection::vec(1u32..=365, 0..40),
    ) {
        let holidays = holiday_set(year, &ordinals);
        let cal = build_trading_days(&holidays, year, year).unwrap();

        for d in cal.iter() {
            prop_assert!(d.weekday() != Weekday::Sat && d.weekday() != Weekday::Sun);
            prop_assert!(!holidays.contains(&d));
            prop_assert_eq!(d.year(), year);
        }
    }

    #[test]
    fn effective_date_is_repeatable_and_a_member(
        year in 2010i32..2030,
        ordinals in proptest::collection::vec(1u32..=365, 0..20),
        ordinal in 40u32..=360,
        hour in 0u32..24,
        cutoff in 0u32..=24,
    ) {
        let cal = build_trading_days(&holiday_set(year, &ordinals), year, year).unwrap();
        let now: NaiveDateTime = day_of(year, ordinal).and_hms_opt(hour, 30, 0).unwrap();

        let first = resolve_effective_date(&cal, now, cutoff);
        let second = resolve_effective_date(&cal, now, cutoff);
        prop_assert_eq!(&first, &second);

        let d = first.unwrap();
        prop_assert!(cal.contains(d));
        prop_assert!(d <= now.date());
    }

    #[test]
    fn window_is_ascending_bounded_and_members_only(
        year in 2010i32..2030,
        ordinals in proptest::collection::vec(1u32..=365, 0..30),
        ordinal in 1u32..=365,
        hour in 0u32..24,
        n in 0usize..30,
    ) {
        let cal = build_trading_days(&holiday_set(year, &ordinals), year, year).unwrap();
        let anchor = day_of(year, ordinal).and_hms_opt(hour, 0, 0).unwrap();

        let w = previous_n_trading_days(&cal, anchor, n, 21);
        prop_assert!(w.len() <= n);
        prop_assert!(w.windows(2).all(|p| p[0] < p[1]));
        prop_assert!(w.iter().all(|d| cal.contains(*d)));
        prop_assert!(w.iter().all(|d| *d <= anchor.date()));
        if let Some(first) = w.first() {
            // Never reaches beyond n * 3 calendar days back from the anchor date.
            let floor = anchor.date() - Duration::days((n * WINDOW_LOOKBACK_FACTOR) as i64);
            prop_assert!(*first >= floor);
        }

        prop_assert_eq!(previous_n_trading_days(&cal, anchor, n, 21), w);
    }
}

// ---------------------------------------------------------------------------
// Fixed scenarios
// ---------------------------------------------------------------------------

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// January 2025 with 1/9 listed as a holiday: the window before the cutoff on
/// the holiday is the three preceding trading days.
#[test]
fn holiday_morning_window_of_three() {
    let holidays: BTreeSet<_> = [ymd(2025, 1, 9)].into_iter().collect();
    let cal = build_trading_days(&holidays, 2025, 2025).unwrap();
    let anchor = ymd(2025, 1, 9).and_hms_opt(10, 0, 0).unwrap();

    let w = previous_n_trading_days(&cal, anchor, 3, 21);
    assert_eq!(w, vec![ymd(2025, 1, 6), ymd(2025, 1, 7), ymd(2025, 1, 8)]);
}

/// Lunar New Year 2025: 1/23 through 1/31 closed (Thu..Fri, 7 weekdays).
/// On the first Monday back before the cutoff the effective date is 1/22.
#[test]
fn long_closure_resolves_before_the_break() {
    let entries: Vec<HolidayEntry> = [23, 24, 27, 28, 29, 30, 31]
        .into_iter()
        .map(|d| HolidayEntry::new(ymd(2025, 1, d), "Lunar New Year"))
        .collect();
    let cal = build_trading_days(&holiday_dates(&entries), 2025, 2025).unwrap();

    let now = ymd(2025, 2, 3).and_hms_opt(8, 0, 0).unwrap();
    assert_eq!(resolve_effective_date(&cal, now, 21).unwrap(), ymd(2025, 1, 22));

    // n = 5 inspects 15 calendar days (2/2 back to 1/19): the closure eats most
    // of that budget, so the window comes back short rather than failing.
    let w = previous_n_trading_days(&cal, now, 5, 21);
    assert_eq!(w, vec![ymd(2025, 1, 20), ymd(2025, 1, 21), ymd(2025, 1, 22)]);
}

/// A calendar that stops at the end of 2024 cannot answer for mid-2025.
#[test]
fn stale_calendar_surfaces_insufficient_data() {
    let cal = build_trading_days(&BTreeSet::new(), 2024, 2024).unwrap();
    let now = ymd(2025, 6, 2).and_hms_opt(22, 0, 0).unwrap();

    let err = resolve_effective_date(&cal, now, 21).unwrap_err();
    assert!(matches!(err, CalendarError::InsufficientCalendarData { .. }));
    assert!(err.to_string().contains("insufficient calendar data"));
}
