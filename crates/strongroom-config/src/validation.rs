// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of the configuration model.

use thiserror::Error;

use crate::model::StrongroomConfig;

/// A configuration problem detected at load time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("api.base_url must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("api.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("app.log_level must be one of trace, debug, info, warn, error; got {0:?}")]
    InvalidLogLevel(String),

    #[error("configuration could not be loaded: {0}")]
    Load(#[from] figment::Error),
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validates a deserialized config, collecting every problem rather than
/// stopping at the first.
pub fn validate_config(config: &StrongroomConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let url = config.api.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(ConfigError::InvalidBaseUrl(config.api.base_url.clone()));
    }

    if config.api.request_timeout_secs == 0 {
        errors.push(ConfigError::ZeroRequestTimeout);
    }

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(ConfigError::InvalidLogLevel(config.app.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
