//! Unused-key guard.
//!
//! "Consumed pointers" are JSON Pointer prefixes read by [`crate::AppConfig`].
//! A leaf under any consumed prefix is consumed; every other leaf is reported.
//! Callers decide whether that is a warning or an error.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Consumed prefixes used for this analysis (sorted, unique).
    pub consumed_prefixes: Vec<String>,
    /// Leaf pointers not covered by any consumed prefix (sorted).
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Pointers read by `AppConfig::from_config_json`. Keep in step with the
/// settings structs; a field added there and not here shows up as unused.
pub fn consumed_pointers() -> &'static [&'static str] {
    &[
        // calendar
        "/calendar/holiday_file",
        "/calendar/year_start",
        "/calendar/year_end",
        "/calendar/cutoff_hour",
        "/calendar/timezone",
        // trend
        "/trend/window_days",
        "/trend/top_n",
        "/trend/volume_floor",
        "/trend/max_workers",
        // data
        "/data/daily_dir",
        "/data/file_pattern",
        "/data/code_column",
        "/data/name_column",
        "/data/volume_column",
        // retry
        "/retry/max_attempts",
        "/retry/base_delay_ms",
        "/retry/max_delay_ms",
    ]
}

/// With `Fail`, errors when anything is unused. With `Warn`, always returns the report.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let consumed: BTreeSet<String> = consumed_pointers()
        .iter()
        .map(|p| normalize_pointer(p))
        .collect();
    let consumed_prefixes: Vec<String> = consumed.into_iter().collect();

    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|lp| !consumed_prefixes.iter().any(|cp| is_prefix_pointer(cp, lp)))
        .collect();
    unused.sort();
    unused.dedup();

    let report = UnusedKeyReport {
        consumed_prefixes,
        unused_leaf_pointers: unused,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        bail!(
            "CONFIG_UNUSED_KEYS: {} unused config leaf key(s) detected. \
            Remove them or update the consumed registry. First few: {:?}",
            report.unused_leaf_pointers.len(),
            report.unused_leaf_pointers.iter().take(12).collect::<Vec<_>>()
        );
    }

    Ok(report)
}

/// Registry entries are written `/trend/top_n`; `trend/top_n/` normalizes to
/// the same pointer.
fn normalize_pointer(p: &str) -> String {
    let trimmed = p.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// `/retry` covers `/retry` and `/retry/max_attempts` but not `/retry_policy/x`.
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if prefix == "/" || leaf == prefix {
        return true;
    }
    leaf.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Every scalar in the document as a JSON pointer, e.g. `/calendar/cutoff_hour`
/// or `/notify/extra_headers/1`. `~` and `/` inside keys are escaped.
pub(crate) fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    let children: Vec<(String, &Value)> = match v {
        Value::Object(map) => map
            .iter()
            .map(|(k, child)| (k.replace('~', "~0").replace('/', "~1"), child))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, child)| (i.to_string(), child))
            .collect(),
        _ => {
            out.push(if prefix.is_empty() { "/".to_string() } else { prefix.to_string() });
            return;
        }
    };
    for (token, child) in children {
        collect_leaf_pointers(child, &format!("{prefix}/{token}"), out);
    }
}
