use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::provider::openweather::ClientSettings;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Settings for the OpenWeather upstream.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override for tests or proxies; defaults to the public endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Append-only lookup log. No log is written when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Example TOML:
    /// [openweather]
    /// api_key = "..."
    #[serde(default)]
    pub openweather: ProviderConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-lookup", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    /// Returns the API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.openweather.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Overlay values taken from the environment on top of the file contents.
    ///
    /// `var` is usually `|name| std::env::var(name).ok()`.
    pub fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = var(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            tracing::debug!("using API key from {API_KEY_ENV}");
            self.openweather.api_key = Some(key);
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            api_key: self.api_key().map(str::to_owned),
            base_url: self
                .openweather
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                self.openweather.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_use_public_endpoint_and_five_second_timeout() {
        let settings = Config::default().client_settings();

        assert_eq!(settings.api_key, None);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        assert_eq!(cfg.api_key(), None);
        assert_eq!(cfg.client_settings().api_key, None);
    }

    #[test]
    fn env_override_wins_over_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        cfg.apply_env_overrides(|name| (name == API_KEY_ENV).then(|| "ENV_KEY".to_string()));

        assert_eq!(cfg.api_key(), Some("ENV_KEY"));
    }

    #[test]
    fn empty_env_value_does_not_clear_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        cfg.apply_env_overrides(|_| Some(String::new()));

        assert_eq!(cfg.api_key(), Some("FILE_KEY"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.openweather.timeout_secs = Some(9);
        cfg.log_file = Some(PathBuf::from("weather_log.txt"));
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.api_key(), Some("KEY"));
        assert_eq!(loaded.openweather.timeout_secs, Some(9));
        assert_eq!(loaded.log_file, Some(PathBuf::from("weather_log.txt")));
        assert_eq!(loaded.client_settings().timeout, Duration::from_secs(9));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");

        assert!(cfg.api_key().is_none());
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "openweather = [").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
