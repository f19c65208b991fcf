// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Strongroom vault client.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! let config = strongroom_config::load_and_validate().expect("config errors");
//! println!("API origin: {}", config.api.base_url);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ApiConfig, AppConfig, StrongroomConfig};
pub use validation::{validate_config, ConfigError};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid [`StrongroomConfig`] or the list of problems found.
pub fn load_and_validate() -> Result<StrongroomConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Load(err)]),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<StrongroomConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Load(err)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_inline_config_passes_end_to_end() {
        let config = load_and_validate_str(
            "[api]\nbase_url = \"https://vault.example.com\"\nrequest_timeout_secs = 10\n",
        )
        .expect("should validate");
        assert_eq!(config.api.base_url, "https://vault.example.com");
        assert_eq!(config.api.request_timeout_secs, 10);
    }

    #[test]
    fn invalid_inline_config_reports_errors() {
        let errors = load_and_validate_str("[api]\nbase_url = \"vault.example.com\"\n")
            .expect_err("missing scheme should fail");
        assert!(matches!(errors[0], ConfigError::InvalidBaseUrl(_)));
    }
}
