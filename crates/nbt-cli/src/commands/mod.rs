//! Command handler modules for the `nbt` binary.
//!
//! Shared loading steps (config, "now", calendar) live here.
//! Command-specific logic lives in the submodules.

pub mod calendar;
pub mod trend;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use nbt_calendar::{build_trading_days, holiday_dates, TradingCalendar};
use nbt_config::{report_unused_keys, AppConfig, CalendarSettings, LoadedConfig, UnusedKeyPolicy};
use std::path::Path;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Accepted `--now` layouts, tried in order.
const NOW_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Load, validate and report on the layered config.
///
/// Unused keys are warnings here; a typo in a key should be visible but should
/// not stop the daily run.
pub fn load_config(paths: &[String]) -> Result<(LoadedConfig, AppConfig)> {
    let loaded = nbt_config::load_layered_yaml(paths)?;
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    for pointer in &report.unused_leaf_pointers {
        warn!(%pointer, "config key is not read by nbt");
    }
    let cfg = loaded.app_config()?;
    info!(config_hash = %loaded.config_hash, "config loaded");
    Ok((loaded, cfg))
}

/// `--now` when given, else the wall clock in `tz`. Either way the result is
/// a naive local time in the exchange's zone.
pub fn resolve_now(now: Option<&str>, tz: Tz) -> Result<NaiveDateTime> {
    match now {
        Some(raw) => parse_now(raw),
        None => Ok(Utc::now().with_timezone(&tz).naive_local()),
    }
}

fn parse_now(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    NOW_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .with_context(|| format!("invalid --now '{raw}'. expected YYYY-MM-DDTHH:MM:SS"))
}

/// Build the trading calendar described by `settings`, with `today` filling
/// an unset year range.
///
/// Holiday dates written without a year (`M月D日`) belong to `year_end`: the
/// exchange publishes one schedule per upcoming year.
pub fn load_calendar(settings: &CalendarSettings, today: NaiveDate) -> Result<TradingCalendar> {
    let (year_start, year_end) = settings.year_range(today.year());

    let entries = match &settings.holiday_file {
        Some(path) => nbt_md::load_holiday_file(Path::new(path), year_end)
            .with_context(|| format!("calendar.holiday_file '{path}'"))?,
        None => {
            warn!("no calendar.holiday_file configured; every weekday counts as a trading day");
            Vec::new()
        }
    };
    let holidays = holiday_dates(&entries);

    let calendar = build_trading_days(&holidays, year_start, year_end)?;
    info!(
        year_start,
        year_end,
        holidays = holidays.len(),
        trading_days = calendar.len(),
        "trading calendar built"
    );
    Ok(calendar)
}
