// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./strongroom.toml` >
//! `~/.config/strongroom/strongroom.toml` > `/etc/strongroom/strongroom.toml`
//! with environment variable overrides via the `STRONGROOM_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use tracing::debug;

use crate::model::StrongroomConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/strongroom/strongroom.toml` (system-wide)
/// 3. `~/.config/strongroom/strongroom.toml` (user XDG config)
/// 4. `./strongroom.toml` (local directory)
/// 5. `STRONGROOM_*` environment variables
pub fn load_config() -> Result<StrongroomConfig, figment::Error> {
    let user_config = dirs::config_dir()
        .map(|d| d.join("strongroom/strongroom.toml"))
        .unwrap_or_default();
    debug!(user_config = %user_config.display(), "loading configuration");
    let config: StrongroomConfig = Figment::new()
        .merge(Serialized::defaults(StrongroomConfig::default()))
        .merge(Toml::file("/etc/strongroom/strongroom.toml"))
        .merge(Toml::file(user_config))
        .merge(Toml::file("strongroom.toml"))
        .merge(env_provider())
        .extract()?;
    debug!(base_url = %config.api.base_url, "configuration loaded");
    Ok(config)
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and for callers that supply their own config text.
pub fn load_config_from_str(toml_content: &str) -> Result<StrongroomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StrongroomConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StrongroomConfig, figment::Error> {
    debug!(path = %path.display(), "loading configuration from explicit path");
    Figment::new()
        .merge(Serialized::defaults(StrongroomConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing
/// key names stay unambiguous: `STRONGROOM_API_REQUEST_TIMEOUT_SECS` must map
/// to `api.request_timeout_secs`, not `api.request.timeout.secs`.
fn env_provider() -> Env {
    Env::prefixed("STRONGROOM_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("api_", "api.", 1)
            .replacen("app_", "app.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_toml_overrides_defaults() {
        let config = load_config_from_str("[api]\nbase_url = \"https://vault.example.com\"\n")
            .expect("should load");
        assert_eq!(config.api.base_url, "https://vault.example.com");
        // Untouched sections keep their defaults.
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.app.log_level, "info");
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = load_config_from_str("").expect("should load");
        assert_eq!(config.api.base_url, "http://localhost:8080");
    }
}
