// SPDX-FileCopyrightText: 2026 Postcraft Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup: `./postcraft.toml` > `~/.config/postcraft/postcraft.toml` >
//! `/etc/postcraft/postcraft.toml`, with `POSTCRAFT_` environment overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PostcraftConfig;

/// Top-level sections, used to map `POSTCRAFT_<SECTION>_<KEY>` to `section.key`.
const SECTIONS: &[&str] = &[
    "server",
    "gemini",
    "messenger",
    "publisher",
    "storage",
    "client",
];

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/postcraft/postcraft.toml`
/// 3. `~/.config/postcraft/postcraft.toml`
/// 4. `./postcraft.toml`
/// 5. `POSTCRAFT_*` environment variables
pub fn load_config() -> Result<PostcraftConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PostcraftConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PostcraftConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PostcraftConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PostcraftConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used for standard loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PostcraftConfig::default()))
        .merge(Toml::file("/etc/postcraft/postcraft.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("postcraft/postcraft.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("postcraft.toml"))
        .merge(env_provider())
}

/// Maps a lower-cased, prefix-stripped env key to its dotted config path.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `messenger_app_secret` maps to `messenger.app_secret`.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section) {
            if let Some(field) = rest.strip_prefix('_') {
                return format!("{section}.{field}");
            }
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("POSTCRAFT_").map(|key| map_env_key(key.as_str()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("messenger_app_secret"), "messenger.app_secret");
        assert_eq!(map_env_key("server_public_base_url"), "server.public_base_url");
        assert_eq!(map_env_key("storage_busy_timeout_ms"), "storage.busy_timeout_ms");
    }

    #[test]
    fn unknown_prefix_is_left_alone() {
        assert_eq!(map_env_key("unrelated_key"), "unrelated_key");
    }
}
