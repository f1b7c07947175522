//! Trend assembly over a window of trading days.
//!
//! The window is ordered oldest to newest; its last date is the baseline. Each
//! day is loaded and ranked independently, then the presence matrix is built
//! strictly in window order, whatever order the loads completed in.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::loader::DailyRecordLoader;
use crate::topn::select_top_n;
use crate::types::{day_label, DailyTopNRecord, TrendError, TrendReport, TrendRow};
use crate::volume::shares_to_lots;

/// Upper bound on concurrent day loads.
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// One day's outcome, kept in window position.
#[derive(Debug)]
struct DayRecord {
    record: DailyTopNRecord,
    load_failed: bool,
}

impl DayRecord {
    fn failed(date: NaiveDate) -> Self {
        Self {
            record: DailyTopNRecord::empty(date),
            load_failed: true,
        }
    }

    fn has_data(&self) -> bool {
        !self.load_failed && !self.record.is_empty()
    }
}

fn load_day<L: DailyRecordLoader + ?Sized>(
    loader: &L,
    date: NaiveDate,
    top_n: usize,
    volume_floor: i64,
) -> DayRecord {
    match loader.load(date) {
        Ok(rows) => DayRecord {
            record: select_top_n(date, &rows, top_n, volume_floor),
            load_failed: false,
        },
        Err(e) => {
            warn!(%date, error = %e, "daily load failed; treating day as empty");
            DayRecord::failed(date)
        }
    }
}

/// Build a [`TrendReport`] loading one day at a time.
///
/// Fails only with [`TrendError::EmptyWindow`] or [`TrendError::EmptyBaselineDay`];
/// a missing or broken day elsewhere just reads as "absent" for every security.
pub fn build_trend<L: DailyRecordLoader + ?Sized>(
    loader: &L,
    window: &[NaiveDate],
    top_n: usize,
    volume_floor: i64,
) -> Result<TrendReport, TrendError> {
    if window.is_empty() {
        return Err(TrendError::EmptyWindow);
    }
    let days: Vec<DayRecord> = window
        .iter()
        .map(|d| load_day(loader, *d, top_n, volume_floor))
        .collect();
    assemble(days, top_n)
}

/// Build a [`TrendReport`] loading days on a bounded pool of blocking workers
/// (`min(window.len(), max_workers)`, at least one).
///
/// Results are slotted back by window position before assembly, so the report
/// is identical to [`build_trend`] for the same loader.
pub async fn build_trend_concurrent(
    loader: Arc<dyn DailyRecordLoader>,
    window: &[NaiveDate],
    top_n: usize,
    volume_floor: i64,
    max_workers: usize,
) -> Result<TrendReport, TrendError> {
    if window.is_empty() {
        return Err(TrendError::EmptyWindow);
    }

    let workers = max_workers.clamp(1, window.len());
    let permits = Arc::new(Semaphore::new(workers));
    let mut tasks: JoinSet<(usize, DayRecord)> = JoinSet::new();

    for (idx, &date) in window.iter().enumerate() {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            break;
        };
        let loader = Arc::clone(&loader);
        tasks.spawn_blocking(move || {
            let _permit = permit;
            (idx, load_day(loader.as_ref(), date, top_n, volume_floor))
        });
    }

    let mut slots: Vec<Option<DayRecord>> = window.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, day)) => slots[idx] = Some(day),
            Err(e) => warn!(error = %e, "daily load task aborted"),
        }
    }

    let days: Vec<DayRecord> = slots
        .into_iter()
        .zip(window)
        .map(|(slot, date)| slot.unwrap_or_else(|| DayRecord::failed(*date)))
        .collect();

    debug!(days = days.len(), workers, "concurrent loads reassembled");
    assemble(days, top_n)
}

/// Presence matrix against the baseline (last) day.
fn assemble(days: Vec<DayRecord>, top_n: usize) -> Result<TrendReport, TrendError> {
    let (baseline, prior) = days.split_last().ok_or(TrendError::EmptyWindow)?;
    let baseline_date = baseline.record.date;
    if baseline.record.is_empty() {
        return Err(TrendError::EmptyBaselineDay {
            date: baseline_date,
        });
    }

    let rows: Vec<TrendRow> = baseline
        .record
        .entries
        .iter()
        .take(top_n)
        .map(|entry| {
            let presence: Vec<bool> = prior
                .iter()
                .map(|d| d.record.contains_code(&entry.code))
                .collect();
            let streak = 1 + presence.iter().rev().take_while(|p| **p).count();
            TrendRow {
                code: entry.code.clone(),
                name: entry.name.clone(),
                net_volume_shares: entry.net_volume,
                net_volume_lots: shares_to_lots(entry.net_volume),
                presence,
                streak,
            }
        })
        .collect();

    let days_without_data: Vec<String> = days
        .iter()
        .filter(|d| !d.has_data())
        .map(|d| day_label(d.record.date))
        .collect();
    if !days_without_data.is_empty() {
        warn!(
            baseline = %baseline_date,
            missing = ?days_without_data,
            "trend computed with days lacking data"
        );
    }

    Ok(TrendReport {
        baseline_date,
        baseline_label: day_label(baseline_date),
        window: prior.iter().map(|d| d.record.date).collect(),
        day_labels: prior.iter().map(|d| day_label(d.record.date)).collect(),
        rows,
        days_without_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadError;
    use crate::types::RawTradeRow;
    use std::collections::HashMap;

    fn ymd(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn rows(raw: &[(&str, &str, &str)]) -> Vec<RawTradeRow> {
        raw.iter()
            .map(|(c, n, v)| RawTradeRow::new(*c, *n, *v))
            .collect()
    }

    fn map_loader(
        data: HashMap<NaiveDate, Vec<RawTradeRow>>,
    ) -> impl Fn(NaiveDate) -> Result<Vec<RawTradeRow>, LoadError> + Send + Sync {
        move |d| {
            data.get(&d)
                .cloned()
                .ok_or_else(|| LoadError::NotFound(d.to_string()))
        }
    }

    #[test]
    fn presence_against_prior_day() {
        let mut data = HashMap::new();
        data.insert(
            ymd(1, 7),
            rows(&[
                ("2317", "Foxconn", "900,000"),
                ("9999", "Other", "800,000"),
                ("1234", "Another", "700,000"),
            ]),
        );
        data.insert(
            ymd(1, 8),
            rows(&[
                ("2330", "TSMC", "500,000"),
                ("2317", "Foxconn", "300,000"),
                ("2454", "MTK", "200,000"),
            ]),
        );

        let report = build_trend(&map_loader(data), &[ymd(1, 7), ymd(1, 8)], 3, 0).unwrap();
        assert_eq!(report.baseline_date, ymd(1, 8));
        assert_eq!(report.day_labels, vec!["01/07"]);

        let by_code: HashMap<&str, &TrendRow> =
            report.rows.iter().map(|r| (r.code.as_str(), r)).collect();
        assert_eq!(by_code["2330"].presence, vec![false]);
        assert_eq!(by_code["2317"].presence, vec![true]);
        assert_eq!(by_code["2317"].streak, 2);
        assert_eq!(by_code["2330"].net_volume_lots, 500);
        assert!(!report.is_degraded());
    }

    #[test]
    fn empty_baseline_is_fatal() {
        let mut data = HashMap::new();
        data.insert(ymd(1, 7), rows(&[("2330", "TSMC", "1")]));
        data.insert(ymd(1, 8), rows(&[("2330", "TSMC", "-1")]));

        let err = build_trend(&map_loader(data), &[ymd(1, 7), ymd(1, 8)], 3, 0).unwrap_err();
        assert_eq!(err, TrendError::EmptyBaselineDay { date: ymd(1, 8) });
    }

    #[test]
    fn missing_baseline_file_is_fatal() {
        let err = build_trend(&map_loader(HashMap::new()), &[ymd(1, 8)], 3, 0).unwrap_err();
        assert!(matches!(err, TrendError::EmptyBaselineDay { .. }));
    }

    #[test]
    fn empty_window_is_rejected() {
        let err = build_trend(&map_loader(HashMap::new()), &[], 3, 0).unwrap_err();
        assert_eq!(err, TrendError::EmptyWindow);
    }

    #[test]
    fn single_day_window_has_no_presence_columns() {
        let mut data = HashMap::new();
        data.insert(ymd(1, 8), rows(&[("2330", "TSMC", "1,500")]));

        let report = build_trend(&map_loader(data), &[ymd(1, 8)], 3, 0).unwrap();
        assert!(report.day_labels.is_empty());
        assert_eq!(report.rows[0].presence, Vec::<bool>::new());
        assert_eq!(report.rows[0].streak, 1);
        assert_eq!(report.rows[0].net_volume_lots, 2);
    }
}
