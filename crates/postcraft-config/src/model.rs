// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for postcraft.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup. Secrets are optional so that loading never fails
//! on a missing key; the server reports them on the endpoints that need them.

use serde::{Deserialize, Serialize};

const REDACTED: &str = "[REDACTED]";

fn redact(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| REDACTED)
}

/// Top-level postcraft configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PostcraftConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Generation backend settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Messaging platform webhook and delivery settings.
    #[serde(default)]
    pub messenger: MessengerConfig,

    /// Page publishing settings.
    #[serde(default)]
    pub publisher: PublisherConfig,

    /// State store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Local client (shell) settings.
    #[serde(default)]
    pub client: ClientConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally reachable base URL, used to build deletion status links.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: None,
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Base URL for links handed out to external callers.
    pub fn base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gemini REST API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. Falls back to the `GEMINI_API_KEY` env var at startup.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    #[serde(default = "default_text_model")]
    pub text_model: String,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// Prebuilt voice name used for speech synthesis.
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Ceiling for a single HTTP round trip, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            tts_model: default_tts_model(),
            voice: default_voice(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("tts_model", &self.tts_model)
            .field("voice", &self.voice)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_voice() -> String {
    "Kore".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Messenger webhook and Send API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessengerConfig {
    /// Page access token used for the Send API.
    #[serde(default)]
    pub page_access_token: Option<String>,

    /// Token echoed back during webhook subscription.
    #[serde(default)]
    pub verify_token: Option<String>,

    /// App secret for payload signatures and signed requests.
    #[serde(default)]
    pub app_secret: Option<String>,

    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Check `X-Hub-Signature-256` on deliveries when an app secret is set.
    #[serde(default = "default_true")]
    pub verify_payload_signature: bool,
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            page_access_token: None,
            verify_token: None,
            app_secret: None,
            graph_base_url: default_graph_base_url(),
            api_version: default_api_version(),
            verify_payload_signature: true,
        }
    }
}

impl MessengerConfig {
    /// Versioned Graph API root, e.g. `https://graph.facebook.com/v21.0`.
    pub fn graph_root(&self) -> String {
        format!(
            "{}/{}",
            self.graph_base_url.trim_end_matches('/'),
            self.api_version
        )
    }
}

impl std::fmt::Debug for MessengerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessengerConfig")
            .field("page_access_token", &redact(&self.page_access_token))
            .field("verify_token", &redact(&self.verify_token))
            .field("app_secret", &redact(&self.app_secret))
            .field("graph_base_url", &self.graph_base_url)
            .field("api_version", &self.api_version)
            .field("verify_payload_signature", &self.verify_payload_signature)
            .finish()
    }
}

fn default_graph_base_url() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_api_version() -> String {
    "v21.0".to_string()
}

fn default_true() -> bool {
    true
}

/// Page publishing configuration.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PublisherConfig {
    /// Target page id.
    #[serde(default)]
    pub page_id: Option<String>,

    /// Overrides `messenger.page_access_token` for publishing.
    #[serde(default)]
    pub page_access_token: Option<String>,
}

impl std::fmt::Debug for PublisherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublisherConfig")
            .field("page_id", &self.page_id)
            .field("page_access_token", &redact(&self.page_access_token))
            .finish()
    }
}

/// SQLite state store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Upper bound for opening the database, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// SQLite `busy_timeout`, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            connect_timeout_secs: default_connect_timeout_secs(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("postcraft").join("postcraft.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("postcraft.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// Local shell client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// JSON file holding the local schedule reminder list.
    #[serde(default = "default_schedule_path")]
    pub schedule_path: String,

    /// Sender id used for the local session.
    #[serde(default = "default_local_sender")]
    pub sender_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            schedule_path: default_schedule_path(),
            sender_id: default_local_sender(),
        }
    }
}

fn default_schedule_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("postcraft").join("schedule.json"))
        .unwrap_or_else(|| std::path::PathBuf::from("schedule.json"))
        .to_string_lossy()
        .into_owned()
}

fn default_local_sender() -> String {
    "local".to_string()
}
