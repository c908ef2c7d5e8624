// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the postcraft configuration system.

use postcraft_config::diagnostic::ConfigError;
use postcraft_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8080
public_base_url = "https://postcraft.example"
log_level = "debug"

[gemini]
api_key = "AIza-test"
text_model = "gemini-2.5-pro"
voice = "Puck"

[messenger]
page_access_token = "EAAB"
verify_token = "verify-me"
app_secret = "s3cret"
api_version = "v20.0"
verify_payload_signature = false

[publisher]
page_id = "1234567890"

[storage]
database_path = "/tmp/postcraft-test.db"
connect_timeout_secs = 2

[client]
schedule_path = "/tmp/schedule.json"
sender_id = "me"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.gemini.api_key.as_deref(), Some("AIza-test"));
    assert_eq!(config.gemini.text_model, "gemini-2.5-pro");
    assert_eq!(config.gemini.image_model, "gemini-2.5-flash-image");
    assert_eq!(config.gemini.voice, "Puck");
    assert_eq!(config.messenger.verify_token.as_deref(), Some("verify-me"));
    assert!(!config.messenger.verify_payload_signature);
    assert_eq!(config.messenger.graph_root(), "https://graph.facebook.com/v20.0");
    assert_eq!(config.publisher.page_id.as_deref(), Some("1234567890"));
    assert_eq!(config.storage.connect_timeout_secs, 2);
    assert_eq!(config.client.sender_id, "me");
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty config is valid");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.gemini.tts_model, "gemini-2.5-flash-preview-tts");
    assert!(config.messenger.verify_payload_signature);
    assert!(config.gemini.api_key.is_none());
}

#[test]
fn unknown_key_gets_suggestion() {
    let toml = r#"
[messenger]
verfy_token = "abc"
"#;

    let errors = load_and_validate_str(toml).expect_err("typo must be rejected");
    let suggested = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion: Some(s), .. }
                if key == "verfy_token" && s == "verify_token"
        )
    });
    assert!(suggested, "expected a suggestion, got: {errors:?}");
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telegram]\nbot_token = \"x\"\n")
        .expect_err("unknown section must be rejected");
    assert!(!errors.is_empty());
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[server]\nport = \"eighty\"\n")
        .expect_err("string port must be rejected");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key == "server.port")),
        "got: {errors:?}"
    );
}

#[test]
fn validation_runs_after_parsing() {
    let errors = load_and_validate_str("[server]\nlog_level = \"chatty\"\n")
        .expect_err("bad log level must fail validation");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
fn file_typo_is_reported_with_suggestion() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("postcraft.toml");
    std::fs::write(&path, "[gemini]\napi_kye = \"x\"\n").unwrap();

    let errors = load_and_validate_path(&path).expect_err("typo must be rejected");

    match &errors[0] {
        ConfigError::UnknownKey { suggestion, .. } => {
            assert_eq!(suggestion.as_deref(), Some("api_key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
