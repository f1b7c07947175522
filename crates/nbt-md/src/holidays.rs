//! Holiday-list reader.
//!
//! The exchange publishes its closure schedule in mixed date notations:
//! `YYYY/M/D`, `YYYY-M-D`, ROC-era `YYY/M/D` (add 1911), `M月D日` (year implied
//! by the file), and `YYY年M月D日`. Rows whose date cannot be read are skipped
//! with a warning; they never abort the load.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use nbt_calendar::HolidayEntry;
use tracing::{debug, warn};

use crate::decode::{decode_text, DecodeError};

/// Offset between ROC (Minguo) years and the Gregorian calendar.
const ROC_YEAR_OFFSET: i32 = 1911;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolidayFileError {
    Io(String),
    Decode(DecodeError),
}

impl fmt::Display for HolidayFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HolidayFileError::Io(msg) => write!(f, "holiday file io error: {msg}"),
            HolidayFileError::Decode(e) => write!(f, "holiday file decode error: {e}"),
        }
    }
}

impl std::error::Error for HolidayFileError {}

/// Read one holiday date in any of the supported notations.
///
/// `default_year` fills in `M月D日` dates that carry no year.
pub fn parse_holiday_date(raw: &str, default_year: i32) -> Option<NaiveDate> {
    let s = raw.trim().trim_matches('"').trim();

    if let Some(rest) = s.strip_suffix('日') {
        let (year, md) = match rest.split_once('年') {
            Some((y, md)) => (to_gregorian(y.trim().parse().ok()?)?, md),
            None => (default_year, rest),
        };
        let (m, d) = md.split_once('月')?;
        return NaiveDate::from_ymd_opt(year, m.trim().parse().ok()?, d.trim().parse().ok()?);
    }

    let parts: Vec<&str> = s.split(['/', '-']).map(str::trim).collect();
    let [y, m, d] = parts.as_slice() else {
        return None;
    };
    let year = to_gregorian(y.parse().ok()?)?;
    NaiveDate::from_ymd_opt(year, m.parse().ok()?, d.parse().ok()?)
}

fn to_gregorian(year: i32) -> Option<i32> {
    match year {
        y if y <= 0 => None,
        y if y < ROC_YEAR_OFFSET => Some(y + ROC_YEAR_OFFSET),
        y => Some(y),
    }
}

/// Parse holiday rows from decoded CSV text.
///
/// Column order varies between publications, so each row's date is the first
/// field that parses as one and its label is the first other non-empty field.
/// Duplicates are kept here; the calendar deduplicates by date.
pub fn parse_holiday_csv(src: &str, default_year: i32) -> Vec<HolidayEntry> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(src.as_bytes());

    let mut out = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(row, error = %e, "skipping malformed holiday row");
                continue;
            }
        };
        let fields: Vec<&str> = record.iter().map(str::trim).collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }

        let found = fields
            .iter()
            .enumerate()
            .find_map(|(i, f)| parse_holiday_date(f, default_year).map(|d| (i, d)));

        let Some((date_col, date)) = found else {
            if row == 0 {
                debug!(?fields, "skipping holiday header row");
            } else {
                warn!(row, ?fields, "skipping holiday row with invalid date format");
            }
            continue;
        };

        let label = fields
            .iter()
            .enumerate()
            .find(|(i, f)| *i != date_col && !f.is_empty())
            .map(|(_, f)| f.to_string())
            .unwrap_or_default();

        out.push(HolidayEntry::new(date, label));
    }
    out
}

/// Read, decode and parse a holiday file.
pub fn load_holiday_file(
    path: &Path,
    default_year: i32,
) -> Result<Vec<HolidayEntry>, HolidayFileError> {
    let bytes = fs::read(path)
        .map_err(|e| HolidayFileError::Io(format!("read '{}': {e}", path.display())))?;
    let (text, encoding) = decode_text(&bytes).map_err(HolidayFileError::Decode)?;
    let entries = parse_holiday_csv(&text, default_year);
    debug!(path = %path.display(), ?encoding, entries = entries.len(), "holiday file loaded");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn gregorian_slash_and_dash() {
        assert_eq!(parse_holiday_date("2025/1/1", 1999), Some(ymd(2025, 1, 1)));
        assert_eq!(parse_holiday_date("2025-02-28", 1999), Some(ymd(2025, 2, 28)));
    }

    #[test]
    fn roc_year_adds_1911() {
        assert_eq!(parse_holiday_date("114/1/27", 1999), Some(ymd(2025, 1, 27)));
        assert_eq!(parse_holiday_date("\"115/02/16\"", 1999), Some(ymd(2026, 2, 16)));
    }

    #[test]
    fn month_day_uses_default_year() {
        assert_eq!(parse_holiday_date("1月1日", 2025), Some(ymd(2025, 1, 1)));
        assert_eq!(parse_holiday_date("10月10日", 2026), Some(ymd(2026, 10, 10)));
        assert_eq!(parse_holiday_date("114年4月4日", 1999), Some(ymd(2025, 4, 4)));
    }

    #[test]
    fn invalid_dates_are_none() {
        for s in ["", "日期", "2025/13/1", "2/30", "2月30日", "0/1/1", "a/b/c", "2025/1"] {
            assert_eq!(parse_holiday_date(s, 2025), None, "input {s:?}");
        }
    }

    #[test]
    fn csv_rows_in_either_column_order() {
        let src = "\
名稱,日期,星期,說明
中華民國開國紀念日,1月1日,三,依規定放假1日
\"農曆春節\",\"114/1/22\",三,
和平紀念日,2025/2/28,五,
壞掉的列,someday,,
2025-04-04,兒童節,,
";
        let entries = parse_holiday_csv(src, 2025);
        let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![ymd(2025, 1, 1), ymd(2025, 1, 22), ymd(2025, 2, 28), ymd(2025, 4, 4)]
        );
        assert_eq!(entries[0].label, "中華民國開國紀念日");
        assert_eq!(entries[3].label, "兒童節");
    }
}
