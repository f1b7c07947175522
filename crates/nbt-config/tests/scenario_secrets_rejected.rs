//! Secret-literal guard.
//!
//! GREEN when:
//! - A token-looking literal anywhere in the merged document fails the load
//!   with CONFIG_SECRET_DETECTED, and the value is never echoed.
//! - Env-var names (the supported way to point at a token) load fine.

use nbt_config::load_layered_yaml_from_strings;

const WITH_ENV_NAMES: &str = r#"
notify:
  line_token_env: "LINE_NOTIFY_TOKEN"
  gemini_key_env: "GEMINI_API_KEY"
"#;

#[test]
fn env_var_names_are_accepted() {
    let loaded = load_layered_yaml_from_strings(&[WITH_ENV_NAMES]).unwrap();
    let name = loaded
        .config_json
        .pointer("/notify/line_token_env")
        .and_then(|v| v.as_str())
        .unwrap();
    assert_eq!(name, "LINE_NOTIFY_TOKEN");
}

#[test]
fn google_api_key_literal_is_rejected() {
    let yaml = r#"
notify:
  gemini_key_env: "AIzaSyD-not-a-real-key-000000000"
"#;
    let err = load_layered_yaml_from_strings(&[yaml]).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("CONFIG_SECRET_DETECTED"), "got: {msg}");
    assert!(msg.contains("/notify/gemini_key_env"));
    assert!(!msg.contains("AIzaSyD"), "secret value must be redacted");
}

#[test]
fn secret_in_overlay_layer_is_rejected() {
    let overlay = r#"
notify:
  line_token_env: "sk-live-abc123secretvalue"
"#;
    let err = load_layered_yaml_from_strings(&[WITH_ENV_NAMES, overlay]).unwrap_err();
    assert!(format!("{err}").contains("CONFIG_SECRET_DETECTED"));
}

#[test]
fn secret_inside_list_is_rejected() {
    let yaml = r#"
notify:
  extra_headers:
    - "plain"
    - "ghp_0123456789abcdefghij"
"#;
    let err = load_layered_yaml_from_strings(&[yaml]).unwrap_err();
    assert!(format!("{err}").contains("/notify/extra_headers/1"));
}
