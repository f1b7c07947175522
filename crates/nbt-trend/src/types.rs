use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display format for day labels in report headers.
pub const DAY_LABEL_FORMAT: &str = "%m/%d";

pub fn day_label(date: NaiveDate) -> String {
    date.format(DAY_LABEL_FORMAT).to_string()
}

/// One decoded row from a per-day institutional-trading source, before any
/// normalisation. `volume_field` may still carry separators, quotes and a sign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTradeRow {
    pub code: String,
    pub name: String,
    pub volume_field: String,
}

impl RawTradeRow {
    pub fn new<C: Into<String>, N: Into<String>, V: Into<String>>(
        code: C,
        name: N,
        volume_field: V,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            volume_field: volume_field.into(),
        }
    }
}

/// A ranked security on one trading day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopNEntry {
    /// Exactly four ASCII digits.
    pub code: String,
    pub name: String,
    /// Net institutional volume in shares (strictly above the day's floor).
    pub net_volume: i64,
}

/// The top-N securities by net buy volume for one trading day.
///
/// Created fresh per day, never mutated. Empty when the day had no usable data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTopNRecord {
    pub date: NaiveDate,
    pub entries: Vec<TopNEntry>,
}

impl DailyTopNRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.entries.iter().any(|e| e.code == code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.code.as_str())
    }
}

/// One baseline security and its presence across the earlier window days.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRow {
    pub code: String,
    pub name: String,
    pub net_volume_shares: i64,
    /// `net_volume_shares` in board lots (round half away from zero).
    pub net_volume_lots: i64,
    /// One marker per non-baseline day, oldest to newest, aligned with
    /// [`TrendReport::day_labels`].
    pub presence: Vec<bool>,
    /// Consecutive days present counting back from the baseline (baseline included).
    pub streak: usize,
}

/// Result of one trend computation, handed to the formatting/notification layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendReport {
    pub baseline_date: NaiveDate,
    pub baseline_label: String,
    /// Non-baseline window days, oldest to newest (presence columns).
    pub window: Vec<NaiveDate>,
    pub day_labels: Vec<String>,
    /// Baseline securities in rank order.
    pub rows: Vec<TrendRow>,
    /// Labels of window days that produced an empty record (missing file, loader
    /// failure, or no qualifying rows). Non-empty means a degraded trend.
    pub days_without_data: Vec<String>,
}

impl TrendReport {
    pub fn is_degraded(&self) -> bool {
        !self.days_without_data.is_empty()
    }
}

/// Fatal trend failures. Per-row and per-day problems never surface here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrendError {
    /// No dates to work with.
    EmptyWindow,
    /// The baseline day has no qualifying securities, so there is nothing to track.
    EmptyBaselineDay { date: NaiveDate },
}

impl fmt::Display for TrendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendError::EmptyWindow => write!(f, "trend window is empty"),
            TrendError::EmptyBaselineDay { date } => {
                write!(f, "baseline day {date} has no qualifying securities")
            }
        }
    }
}

impl std::error::Error for TrendError {}
