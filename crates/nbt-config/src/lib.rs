//! Layered YAML configuration for the net-buy tracker.
//!
//! Documents are merged in order (later layers override earlier ones), checked
//! for literal secrets, canonicalized and hashed. The hash is printed by the CLI
//! so two runs can be compared for "same config" at a glance.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;

mod settings;
mod unused;

pub use settings::{AppConfig, CalendarSettings, DataSettings, RetrySettings, TrendSettings};
pub use unused::{consumed_pointers, report_unused_keys, UnusedKeyPolicy, UnusedKeyReport};

/// Leaf string values starting with any of these abort the load with
/// CONFIG_SECRET_DETECTED. Tokens belong in the environment; the config only
/// names the variable.
const SECRET_PREFIXES: &[&str] = &[
    "sk-",
    "sk_live",
    "sk_test",
    "AKIA",
    "AIza",
    "-----BEGIN",
    "ghp_",
    "gho_",
    "glpat-",
    "xoxb-",
    "xoxp-",
];

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    /// Typed view of the merged document, with defaults and validation applied.
    pub fn app_config(&self) -> Result<AppConfig> {
        AppConfig::from_config_json(&self.config_json)
    }
}

pub fn load_layered_yaml<P: AsRef<std::path::Path>>(paths: &[P]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::with_capacity(paths.len());
    for p in paths {
        let p = p.as_ref();
        let raw = fs::read_to_string(p)
            .with_context(|| format!("failed to read yaml path: {}", p.display()))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for (idx, raw) in yaml_docs.iter().enumerate() {
        let v_yaml: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {idx}"))?;
        // An empty document parses as null; treat it as "no overrides".
        if v_yaml.is_null() {
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    enforce_no_secret_literals(&merged)?;

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = config_hash(&canonical_json);
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Overlay `over` onto `base`. A site layer that sets only `trend.top_n`
/// keeps the base `trend.window_days`; scalars and lists in the overlay
/// replace the base value outright.
fn deep_merge(base: Value, over: Value) -> Value {
    let (mut base_map, over_map) = match (base, over) {
        (Value::Object(b), Value::Object(o)) => (b, o),
        (_, replacement) => return replacement,
    };
    for (key, over_val) in over_map {
        let merged = match base_map.remove(&key) {
            Some(base_val) => deep_merge(base_val, over_val),
            None => over_val,
        };
        base_map.insert(key, merged);
    }
    Value::Object(base_map)
}

fn canonicalize_json(v: &Value) -> Result<String> {
    // serde_json's default Map is ordered by key, so compact serialization is
    // already independent of source key order.
    serde_json::to_string(v).context("canonical json serialize failed")
}

fn config_hash(canonical_json: &str) -> String {
    hex::encode(Sha256::digest(canonical_json.as_bytes()))
}

/// Rejects e.g. `notify.gemini_key_env: "AIza..."`; the key must hold the
/// variable name (`GEMINI_API_KEY`) instead.
fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut leaves = Vec::new();
    unused::collect_leaf_pointers(v, "", &mut leaves);

    let flagged = leaves.into_iter().find(|ptr| {
        v.pointer(ptr)
            .and_then(Value::as_str)
            .is_some_and(looks_like_secret)
    });
    match flagged {
        Some(ptr) => bail!("CONFIG_SECRET_DETECTED leaf={ptr} value=REDACTED"),
        None => Ok(()),
    }
}

/// Env-var names like `LINE_NOTIFY_TOKEN` never match; only values carrying a
/// known token prefix and at least 8 characters do.
fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    t.len() >= 8 && SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}
