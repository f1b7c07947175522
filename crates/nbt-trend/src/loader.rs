//! Per-day data loader boundary.
//!
//! The trend engine never touches files or the network itself; it asks a
//! [`DailyRecordLoader`] for each date. Implementations may cache, decode and
//! retry however they like, but must not depend on another call's side effects.

use std::fmt;

use chrono::NaiveDate;

use crate::types::RawTradeRow;

/// Why a single day could not be loaded. Every variant degrades that day to an
/// empty record; none aborts a trend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// No source exists for the date (e.g. the daily file was never fetched).
    NotFound(String),
    /// A failure worth retrying (timeout, throttling, partial transfer).
    Transient(String),
    /// A local I/O failure.
    Io(String),
    /// The source exists but could not be decoded or parsed.
    Decode(String),
}

impl LoadError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, LoadError::Transient(_))
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(what) => write!(f, "not found: {what}"),
            LoadError::Transient(msg) => write!(f, "transient load failure: {msg}"),
            LoadError::Io(msg) => write!(f, "io error: {msg}"),
            LoadError::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Source of raw per-day rows.
///
/// `Send + Sync` so one loader can serve a bounded pool of blocking workers.
pub trait DailyRecordLoader: Send + Sync {
    fn load(&self, date: NaiveDate) -> Result<Vec<RawTradeRow>, LoadError>;
}

impl<F> DailyRecordLoader for F
where
    F: Fn(NaiveDate) -> Result<Vec<RawTradeRow>, LoadError> + Send + Sync,
{
    fn load(&self, date: NaiveDate) -> Result<Vec<RawTradeRow>, LoadError> {
        self(date)
    }
}
