//! `nbt calendar ...` handlers. Output is `key=value` lines on stdout.

use anyhow::Result;
use nbt_calendar::{previous_n_trading_days, resolve_effective_date};

use super::{load_calendar, load_config, resolve_now};

pub fn effective_date(config_paths: &[String], now: Option<&str>) -> Result<()> {
    let (loaded, cfg) = load_config(config_paths)?;
    let now = resolve_now(now, cfg.calendar.tz()?)?;
    let calendar = load_calendar(&cfg.calendar, now.date())?;

    let date = resolve_effective_date(&calendar, now, cfg.calendar.cutoff_hour)?;

    println!("config_hash={}", loaded.config_hash);
    println!("now={}", now.format("%Y-%m-%dT%H:%M:%S"));
    println!("cutoff_hour={}", cfg.calendar.cutoff_hour);
    println!("effective_date={date}");
    Ok(())
}

pub fn window(config_paths: &[String], now: Option<&str>, days: Option<usize>) -> Result<()> {
    let (loaded, cfg) = load_config(config_paths)?;
    let now = resolve_now(now, cfg.calendar.tz()?)?;
    let calendar = load_calendar(&cfg.calendar, now.date())?;

    let requested = days.unwrap_or(cfg.trend.window_days);
    let window = previous_n_trading_days(&calendar, now, requested, cfg.calendar.cutoff_hour);

    let joined = window
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",");

    println!("config_hash={}", loaded.config_hash);
    println!("now={}", now.format("%Y-%m-%dT%H:%M:%S"));
    println!("requested={requested}");
    println!("found={}", window.len());
    println!("window={joined}");
    Ok(())
}
