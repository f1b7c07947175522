//! nbt-calendar
//!
//! Trading calendar construction and reference-date resolution.
//!
//! Pure deterministic logic. No IO, no wall-clock. Callers provide "now" and the
//! cutoff hour explicitly; the holiday list arrives already parsed.

mod calendar;
mod resolver;
mod types;

pub use calendar::{build_trading_days, holiday_dates, parse_holiday_dates};
pub use resolver::{
    previous_n_trading_days, resolve_effective_date, EFFECTIVE_DATE_MAX_LOOKBACK_DAYS,
    WINDOW_LOOKBACK_FACTOR,
};
pub use types::*;
