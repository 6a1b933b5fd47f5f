//! Configuration service implementation.
//!
//! Loads the application configuration from `config.toml`
//! (`~/.config/algoscope/config.toml` unless another path is given), writing
//! a default file on first run.

use crate::paths::AlgoscopePaths;
use algoscope_core::config::{AppConfig, BASE_URL_ENV};
use algoscope_core::{AlgoscopeError, Result};
use std::path::{Path, PathBuf};

/// Loads the configuration file and applies environment overrides.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Creates a service reading the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a service reading the platform default config file.
    ///
    /// # Errors
    ///
    /// Returns a Config error if the platform config directory is unknown.
    pub fn at_default_location() -> Result<Self> {
        let path = AlgoscopePaths::config_file().map_err(|e| AlgoscopeError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// A missing file is created with the defaults. The `ALGOSCOPE_BASE_URL`
    /// environment variable, when set and non-empty, replaces the configured
    /// base URL.
    ///
    /// # Errors
    ///
    /// Returns an Io error if the file cannot be read or created, or a
    /// Serialization error if it is not valid TOML.
    pub fn load(&self) -> Result<AppConfig> {
        let config = self.load_file()?;
        Ok(apply_env_overrides(config, std::env::var(BASE_URL_ENV).ok()))
    }

    fn load_file(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            let config = AppConfig::default();
            self.write_default(&config)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: AppConfig = toml::from_str(&content)?;
        tracing::debug!("[ConfigService] Loaded config from {}", self.path.display());
        Ok(config)
    }

    fn write_default(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, content)?;
        tracing::info!(
            "[ConfigService] Created default config at {}",
            self.path.display()
        );
        Ok(())
    }
}

/// Applies the base URL override taken from the environment.
pub fn apply_env_overrides(mut config: AppConfig, base_url: Option<String>) -> AppConfig {
    if let Some(url) = base_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        tracing::debug!("[ConfigService] Base URL overridden by {}", BASE_URL_ENV);
        config.gateway.base_url = url;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_core::config::DEFAULT_BASE_URL;
    use algoscope_core::theme::ThemeMode;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let service = ConfigService::new(&path);

        let config = service.load_file().unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(DEFAULT_BASE_URL));
        assert_eq!(service.load_file().unwrap(), config);
    }

    #[test]
    fn test_reads_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[gateway]
base_url = "http://analysis.local:9000"
request_timeout_secs = 15

[ui]
theme = "dark"
"#,
        )
        .unwrap();

        let config = ConfigService::new(&path).load_file().unwrap();
        assert_eq!(config.gateway.base_url, "http://analysis.local:9000");
        assert_eq!(config.gateway.request_timeout_secs, Some(15));
        assert_eq!(config.ui.theme, ThemeMode::Dark);
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gateway\nbase_url = ").unwrap();

        let err = ConfigService::new(&path).load_file().unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_env_override_wins_over_file() {
        let mut config = AppConfig::default();
        config.gateway.base_url = "http://from-file:8000".to_string();

        let config = apply_env_overrides(config, Some("http://from-env:8000".to_string()));
        assert_eq!(config.gateway.base_url, "http://from-env:8000");

        let config = apply_env_overrides(config, Some("   ".to_string()));
        assert_eq!(config.gateway.base_url, "http://from-env:8000");

        let config = apply_env_overrides(config, None);
        assert_eq!(config.gateway.base_url, "http://from-env:8000");
    }
}
