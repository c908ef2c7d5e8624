// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::PostcraftConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validates semantic constraints serde cannot express.
///
/// Collects every problem instead of stopping at the first one. Missing
/// secrets are not errors here; see [`missing_secrets`].
pub fn validate_config(config: &PostcraftConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        invalid("server.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        invalid(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        ));
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        invalid(format!(
            "server.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.server.log_level
        ));
    }

    if let Some(url) = &config.server.public_base_url {
        if !is_http_url(url) {
            invalid(format!("server.public_base_url `{url}` must be an http(s) URL"));
        }
    }

    if !is_http_url(&config.gemini.base_url) {
        invalid(format!(
            "gemini.base_url `{}` must be an http(s) URL",
            config.gemini.base_url
        ));
    }
    if !is_http_url(&config.messenger.graph_base_url) {
        invalid(format!(
            "messenger.graph_base_url `{}` must be an http(s) URL",
            config.messenger.graph_base_url
        ));
    }

    for (key, model) in [
        ("gemini.text_model", &config.gemini.text_model),
        ("gemini.image_model", &config.gemini.image_model),
        ("gemini.tts_model", &config.gemini.tts_model),
    ] {
        if model.trim().is_empty() {
            invalid(format!("{key} must not be empty"));
        }
    }

    if config.gemini.request_timeout_secs == 0 {
        invalid("gemini.request_timeout_secs must be greater than 0".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }
    if config.storage.connect_timeout_secs == 0 {
        invalid("storage.connect_timeout_secs must be greater than 0".to_string());
    }

    if config.client.schedule_path.trim().is_empty() {
        invalid("client.schedule_path must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Secrets the webhook surface needs that are not configured.
///
/// Returned as dotted key names. The server starts without them and answers
/// 500 on the endpoints that depend on them.
pub fn missing_secrets(config: &PostcraftConfig) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if config.gemini.api_key.is_none() {
        missing.push("gemini.api_key");
    }
    if config.messenger.page_access_token.is_none() {
        missing.push("messenger.page_access_token");
    }
    if config.messenger.verify_token.is_none() {
        missing.push("messenger.verify_token");
    }
    if config.messenger.app_secret.is_none() {
        missing.push("messenger.app_secret");
    }
    if config.publisher.page_id.is_none() {
        missing.push("publisher.page_id");
    }
    missing
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
