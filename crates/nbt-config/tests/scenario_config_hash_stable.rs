//! Config layering and hashing.
//!
//! GREEN when:
//! - The same YAML always yields the same canonical JSON and hash.
//! - Reordering keys in the source does not change the hash.
//! - A later layer overrides an earlier one leaf by leaf.
//! - The hash is a 64-char hex SHA-256.

use nbt_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
calendar:
  holiday_file: "data/holidays_2025.csv"
  year_start: 2025
  cutoff_hour: 21
trend:
  window_days: 5
  top_n: 20
"#;

const BASE_YAML_REORDERED: &str = r#"
trend:
  top_n: 20
  window_days: 5
calendar:
  cutoff_hour: 21
  year_start: 2025
  holiday_file: "data/holidays_2025.csv"
"#;

const OVERLAY_YAML: &str = r#"
trend:
  top_n: 10
data:
  daily_dir: "/srv/nbt/daily"
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();

    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let original = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let reordered = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();

    assert_eq!(
        original.config_hash, reordered.config_hash,
        "key order in the source must not change the hash"
    );
}

#[test]
fn overlay_overrides_leaf_and_changes_hash() {
    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let merged = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();

    assert_ne!(base.config_hash, merged.config_hash);

    let top_n = merged
        .config_json
        .pointer("/trend/top_n")
        .and_then(|v| v.as_u64())
        .unwrap();
    assert_eq!(top_n, 10, "overlay should override trend.top_n");

    let window = merged
        .config_json
        .pointer("/trend/window_days")
        .and_then(|v| v.as_u64())
        .unwrap();
    assert_eq!(window, 5, "sibling keys survive the merge");

    let cfg = merged.app_config().unwrap();
    assert_eq!(cfg.data.daily_dir, "/srv/nbt/daily");
    assert_eq!(cfg.calendar.year_start, Some(2025));
}

#[test]
fn empty_layer_is_a_no_op() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML, ""]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
}

#[test]
fn hash_is_64_hex_chars() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(loaded.config_hash.len(), 64);
    assert!(loaded.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn invalid_yaml_is_an_error() {
    let err = load_layered_yaml_from_strings(&[BASE_YAML, "trend: [unclosed"]).unwrap_err();
    assert!(format!("{err:#}").contains("layer 1"));
}
