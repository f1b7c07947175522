//! Typed settings read from the merged config document.
//!
//! Every section and field is optional in YAML; missing values take the
//! defaults below. `from_config_json` validates after deserializing so a bad
//! value fails at startup rather than mid-run.

use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub calendar: CalendarSettings,
    pub trend: TrendSettings,
    pub data: DataSettings,
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Exchange holiday CSV. Without it every weekday is a trading day.
    pub holiday_file: Option<String>,
    /// First calendar year covered. Defaults to the year before the current
    /// one, so January lookbacks can reach December.
    pub year_start: Option<i32>,
    /// Last calendar year covered. Defaults to the current year (or
    /// `year_start`, if later).
    pub year_end: Option<i32>,
    /// Hour (local) at which the day's data counts as final.
    pub cutoff_hour: u32,
    /// IANA zone name "now" is taken in.
    pub timezone: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            holiday_file: None,
            year_start: None,
            year_end: None,
            cutoff_hour: 21,
            timezone: "Asia/Taipei".to_string(),
        }
    }
}

impl CalendarSettings {
    /// Parsed [`Tz`] for `timezone`.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("calendar.timezone '{}': {e}", self.timezone))
    }

    /// Effective `(year_start, year_end)`, filling gaps from `current_year`.
    ///
    /// The default start is `current_year - 1`: both the effective-date walk
    /// (up to 90 days) and the window walk cross Jan 1 on early-January runs.
    pub fn year_range(&self, current_year: i32) -> (i32, i32) {
        let start = self.year_start.unwrap_or(current_year - 1);
        let end = self.year_end.unwrap_or(start.max(current_year));
        (start, end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSettings {
    pub window_days: usize,
    pub top_n: usize,
    /// Rows must be strictly above this many shares to rank.
    pub volume_floor: i64,
    pub max_workers: usize,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            window_days: 5,
            top_n: 20,
            volume_floor: 0,
            max_workers: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub daily_dir: String,
    /// `{yyyymmdd}` or `{yyyy-mm-dd}` is replaced by the trading date.
    pub file_pattern: String,
    pub code_column: String,
    pub name_column: String,
    pub volume_column: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            daily_dir: "data/daily".to_string(),
            file_pattern: "{yyyymmdd}.csv".to_string(),
            code_column: "證券代號".to_string(),
            name_column: "證券名稱".to_string(),
            volume_column: "三大法人買賣超股數".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

impl AppConfig {
    pub fn from_config_json(config_json: &Value) -> Result<Self> {
        let cfg: AppConfig = serde_json::from_value(config_json.clone())
            .context("config does not match the expected shape")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let cal = &self.calendar;
        if cal.cutoff_hour > 24 {
            bail!(
                "CONFIG_INVALID calendar.cutoff_hour={} (expected 0..=24)",
                cal.cutoff_hour
            );
        }
        cal.tz()?;
        if let (Some(start), Some(end)) = (cal.year_start, cal.year_end) {
            if start > end {
                bail!("CONFIG_INVALID calendar.year_start={start} > calendar.year_end={end}");
            }
        }

        let trend = &self.trend;
        if trend.window_days == 0 {
            bail!("CONFIG_INVALID trend.window_days must be at least 1");
        }
        if trend.top_n == 0 {
            bail!("CONFIG_INVALID trend.top_n must be at least 1");
        }
        if trend.max_workers == 0 {
            bail!("CONFIG_INVALID trend.max_workers must be at least 1");
        }

        let data = &self.data;
        if !data.file_pattern.contains("{yyyymmdd}") && !data.file_pattern.contains("{yyyy-mm-dd}")
        {
            bail!(
                "CONFIG_INVALID data.file_pattern '{}' has no date placeholder",
                data.file_pattern
            );
        }
        for (key, val) in [
            ("data.code_column", &data.code_column),
            ("data.name_column", &data.name_column),
            ("data.volume_column", &data.volume_column),
        ] {
            if val.trim().is_empty() {
                bail!("CONFIG_INVALID {key} is empty");
            }
        }

        let retry = &self.retry;
        if retry.max_attempts == 0 {
            bail!("CONFIG_INVALID retry.max_attempts must be at least 1");
        }
        if retry.base_delay_ms > retry.max_delay_ms {
            bail!(
                "CONFIG_INVALID retry.base_delay_ms={} > retry.max_delay_ms={}",
                retry.base_delay_ms,
                retry.max_delay_ms
            );
        }
        Ok(())
    }
}
