//! nbt-md
//!
//! Market-data collaborators for the calendar and trend cores: decoding of
//! exchange downloads, holiday-list and per-day institutional CSV readers, a
//! directory-backed [`nbt_trend::DailyRecordLoader`], and the retry policy
//! wrapped around any loader.
//!
//! This crate does **not** fetch over HTTP; it reads what the fetch job saved.

pub mod decode;
pub mod dir_loader;
pub mod holidays;
pub mod ingest_csv;
pub mod retry;

pub use decode::{decode_text, DecodeError, SourceEncoding};
pub use dir_loader::CsvDirLoader;
pub use holidays::{load_holiday_file, parse_holiday_csv, parse_holiday_date};
pub use ingest_csv::{parse_institutional_csv, CsvIngestError, InstitutionalColumns};
pub use retry::{RetryPolicy, RetryingLoader, Sleeper, ThreadSleeper};
