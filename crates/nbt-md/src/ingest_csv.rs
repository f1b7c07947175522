//! CSV reader for per-day institutional-trading summaries.
//!
//! Exchange day files are not clean CSV tables: a title line precedes the
//! header, and trailing explanatory notes follow the data. This reader
//! locates the header by the configured code-column name and keeps only rows
//! wide enough to carry the three columns it needs. Volume fields are passed
//! through verbatim; normalisation belongs to `nbt-trend`.
//!
//! ## Default column contract
//!
//! | Column               | Example        |
//! |----------------------|----------------|
//! | `證券代號`           | `2330`         |
//! | `證券名稱`           | `台積電`       |
//! | `三大法人買賣超股數` | `"12,345,000"` |

use std::fmt;

use nbt_trend::RawTradeRow;

// ---------------------------------------------------------------------------
// Column configuration
// ---------------------------------------------------------------------------

/// Header names of the three columns the trend needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstitutionalColumns {
    pub code: String,
    pub name: String,
    pub volume: String,
}

impl Default for InstitutionalColumns {
    fn default() -> Self {
        Self {
            code: "證券代號".to_string(),
            name: "證券名稱".to_string(),
            volume: "三大法人買賣超股數".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced by CSV parsing in this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvIngestError {
    /// A CSV-library error (malformed quoting and the like).
    Csv(String),
    /// No header row carrying the code column was found.
    MissingHeader(String),
    /// The header row lacks one of the other required columns.
    MissingColumn(String),
}

impl fmt::Display for CsvIngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvIngestError::Csv(msg) => write!(f, "csv error: {msg}"),
            CsvIngestError::MissingHeader(col) => {
                write!(f, "csv has no header row containing '{col}'")
            }
            CsvIngestError::MissingColumn(col) => {
                write!(f, "csv header is missing required column '{col}'")
            }
        }
    }
}

impl std::error::Error for CsvIngestError {}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse one day's decoded CSV text into raw rows, in source order.
///
/// Blank input is an empty day, not an error. Non-blank input without a
/// recognisable header is [`CsvIngestError::MissingHeader`].
pub fn parse_institutional_csv(
    src: &str,
    columns: &InstitutionalColumns,
) -> Result<Vec<RawTradeRow>, CsvIngestError> {
    if src.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(src.as_bytes());

    let mut index: Option<ColumnIndex> = None;
    let mut out = Vec::new();

    for record in rdr.records() {
        let record = record.map_err(|e| CsvIngestError::Csv(e.to_string()))?;

        let idx = match index {
            Some(idx) => idx,
            None => {
                if record.iter().any(|f| clean_header(f) == columns.code) {
                    index = Some(ColumnIndex::from_header(&record, columns)?);
                }
                continue;
            }
        };

        if record.len() <= idx.widest() {
            // Notes / footer row.
            continue;
        }
        let code = record.get(idx.code).unwrap_or_default();
        if code.trim().is_empty() {
            continue;
        }
        out.push(RawTradeRow::new(
            code,
            record.get(idx.name).unwrap_or_default(),
            record.get(idx.volume).unwrap_or_default(),
        ));
    }

    if index.is_none() {
        return Err(CsvIngestError::MissingHeader(columns.code.clone()));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    code: usize,
    name: usize,
    volume: usize,
}

impl ColumnIndex {
    fn from_header(
        header: &csv::StringRecord,
        columns: &InstitutionalColumns,
    ) -> Result<Self, CsvIngestError> {
        let find = |want: &str| {
            header
                .iter()
                .position(|h| clean_header(h) == want)
                .ok_or_else(|| CsvIngestError::MissingColumn(want.to_string()))
        };
        Ok(Self {
            code: find(&columns.code)?,
            name: find(&columns.name)?,
            volume: find(&columns.volume)?,
        })
    }

    fn widest(&self) -> usize {
        self.code.max(self.name).max(self.volume)
    }
}

fn clean_header(h: &str) -> &str {
    h.trim().trim_start_matches('\u{feff}').trim()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
