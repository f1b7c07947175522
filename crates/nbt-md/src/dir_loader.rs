//! Directory-backed daily loader: one saved exchange file per trading day.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::NaiveDate;
use nbt_trend::{DailyRecordLoader, LoadError, RawTradeRow};
use tracing::debug;

use crate::decode::decode_text;
use crate::ingest_csv::{parse_institutional_csv, InstitutionalColumns};

/// Reads `<dir>/<file_pattern>` for each date.
///
/// Supported placeholders: `{yyyymmdd}` and `{yyyy-mm-dd}`.
#[derive(Debug, Clone)]
pub struct CsvDirLoader {
    dir: PathBuf,
    file_pattern: String,
    columns: InstitutionalColumns,
}

impl CsvDirLoader {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(
        dir: P,
        file_pattern: S,
        columns: InstitutionalColumns,
    ) -> Self {
        Self {
            dir: dir.into(),
            file_pattern: file_pattern.into(),
            columns,
        }
    }

    /// Path of the saved file for `date`.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        let name = self
            .file_pattern
            .replace("{yyyymmdd}", &date.format("%Y%m%d").to_string())
            .replace("{yyyy-mm-dd}", &date.format("%Y-%m-%d").to_string());
        self.dir.join(name)
    }
}

impl DailyRecordLoader for CsvDirLoader {
    fn load(&self, date: NaiveDate) -> Result<Vec<RawTradeRow>, LoadError> {
        let path = self.path_for(date);
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::NotFound(path.display().to_string()),
            _ => LoadError::Io(format!("read '{}': {e}", path.display())),
        })?;

        let (text, encoding) =
            decode_text(&bytes).map_err(|e| LoadError::Decode(format!("{}: {e}", path.display())))?;
        let rows = parse_institutional_csv(&text, &self.columns)
            .map_err(|e| LoadError::Decode(format!("{}: {e}", path.display())))?;

        debug!(%date, path = %path.display(), ?encoding, rows = rows.len(), "daily file loaded");
        Ok(rows)
    }
}
