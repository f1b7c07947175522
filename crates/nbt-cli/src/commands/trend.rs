//! `nbt trend`: calendar window -> per-day CSV loads -> presence report JSON.

use anyhow::{Context, Result};
use nbt_calendar::previous_n_trading_days;
use nbt_config::AppConfig;
use nbt_md::{CsvDirLoader, InstitutionalColumns, RetryPolicy, RetryingLoader};
use nbt_trend::{build_trend, build_trend_concurrent};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::{load_calendar, load_config, resolve_now};

pub async fn run(config_paths: &[String], now: Option<&str>, sequential: bool) -> Result<()> {
    let (loaded, cfg) = load_config(config_paths)?;
    let now = resolve_now(now, cfg.calendar.tz()?)?;
    let calendar = load_calendar(&cfg.calendar, now.date())?;

    let window = previous_n_trading_days(
        &calendar,
        now,
        cfg.trend.window_days,
        cfg.calendar.cutoff_hour,
    );
    info!(
        config_hash = %loaded.config_hash,
        days = window.len(),
        first = ?window.first(),
        last = ?window.last(),
        sequential,
        "trend window resolved"
    );

    let loader = daily_loader(&cfg);
    let top_n = cfg.trend.top_n;
    let floor = cfg.trend.volume_floor;

    let report = if sequential {
        let days = window.clone();
        tokio::task::spawn_blocking(move || build_trend(&loader, &days, top_n, floor))
            .await
            .context("sequential trend task panicked")??
    } else {
        build_trend_concurrent(
            Arc::new(loader),
            &window,
            top_n,
            floor,
            cfg.trend.max_workers,
        )
        .await?
    };

    if report.is_degraded() {
        warn!(days = ?report.days_without_data, "trend built with missing days");
    }
    info!(
        baseline = %report.baseline_date,
        rows = report.rows.len(),
        "trend report ready"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn daily_loader(cfg: &AppConfig) -> RetryingLoader<CsvDirLoader> {
    let columns = InstitutionalColumns {
        code: cfg.data.code_column.clone(),
        name: cfg.data.name_column.clone(),
        volume: cfg.data.volume_column.clone(),
    };
    let policy = RetryPolicy {
        max_attempts: cfg.retry.max_attempts,
        base_delay: Duration::from_millis(cfg.retry.base_delay_ms),
        max_delay: Duration::from_millis(cfg.retry.max_delay_ms),
    };
    RetryingLoader::new(
        CsvDirLoader::new(&cfg.data.daily_dir, cfg.data.file_pattern.clone(), columns),
        policy,
    )
}
