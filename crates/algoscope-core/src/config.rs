//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every field has a
//! default, so a partial or empty file is valid.

use crate::theme::ThemeMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Base URL of the analysis service when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable that overrides [`GatewayConfig::base_url`].
pub const BASE_URL_ENV: &str = "ALGOSCOPE_BASE_URL";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. Unset means the client waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: ThemeMode,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive, e.g. `info` or `algoscope=debug`
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Log directory. Defaults to the `logs` directory next to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            directory: None,
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [ui]
            theme = "dark"
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.gateway.request_timeout_secs, None);
        assert!(config.ui.theme.is_dark());
        assert_eq!(config.logging.filter, "info");
    }
}
