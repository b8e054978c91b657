//! Application configuration.

use crate::consts::dashboard_consts::{
    DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
    refresh::{DEFAULT_INTERVAL_MS, MIN_INTERVAL_MS},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "DASHBOARD_API_URL";
/// Environment variable overriding the refresh interval, in seconds.
pub const REFRESH_INTERVAL_ENV: &str = "REFRESH_INTERVAL";
/// Environment variable overriding the request timeout, in seconds.
pub const API_TIMEOUT_ENV: &str = "API_TIMEOUT";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the dashboard API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Interval between refresh cycles, in milliseconds.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_refresh_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            refresh_interval_ms: default_refresh_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the file if it exists, otherwise starts from the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Removes the configuration file. A missing file is not an error.
    pub fn clear(path: &Path) -> Result<(), std::io::Error> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Unparseable values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(secs) = lookup(REFRESH_INTERVAL_ENV).and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.refresh_interval_ms = secs.saturating_mul(1000);
        }
        if let Some(secs) = lookup(API_TIMEOUT_ENV).and_then(|v| v.trim().parse::<u64>().ok()) {
            self.request_timeout_secs = secs;
        }
        self
    }

    /// Refresh interval, never shorter than the minimum.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(MIN_INTERVAL_MS))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Location of the configuration file: `~/.kimp-dashboard/config.json`.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home_path = home::home_dir().ok_or(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "Failed to get home directory",
    ))?;
    Ok(home_path.join(".kimp-dashboard").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn sample() -> Config {
        Config {
            api_url: "http://10.0.0.5:8502".to_string(),
            refresh_interval_ms: 5_000,
            request_timeout_secs: 3,
        }
    }

    #[test]
    // Loading a saved configuration file should return the same configuration.
    fn test_load_recovers_saved_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = sample();
        config.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    // Saving a configuration should create directories if they don't exist.
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent_dir").join("config.json");

        let result = sample().save(&path);

        assert!(result.is_ok(), "Failed to save config");
        assert!(
            path.parent().unwrap().exists(),
            "Parent directory does not exist"
        );
    }

    #[test]
    // Saving a configuration should overwrite an existing file.
    fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        Config::default().save(&path).unwrap();
        let config2 = sample();
        config2.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config2, loaded_config);
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_config.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = Config::load_from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    // Fields missing from the file fall back to their defaults.
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_url": "http://example.com"}"#).unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.api_url, "http://example.com");
        assert_eq!(config.refresh_interval_ms, DEFAULT_INTERVAL_MS);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_clear_removes_file_and_tolerates_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        sample().save(&path).unwrap();

        Config::clear(&path).unwrap();
        assert!(!path.exists());
        Config::clear(&path).unwrap();
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (API_URL_ENV, "http://bot.local:9000"),
            (REFRESH_INTERVAL_ENV, "30"),
            (API_TIMEOUT_ENV, "not-a-number"),
        ]);
        let config =
            Config::default().with_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_url, "http://bot.local:9000");
        assert_eq!(config.refresh_interval_ms, 30_000);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_refresh_interval_is_clamped() {
        let config = Config {
            refresh_interval_ms: 10,
            ..Config::default()
        };
        assert_eq!(config.refresh_interval(), Duration::from_millis(MIN_INTERVAL_MS));
        assert_eq!(Config::default().refresh_interval(), Duration::from_secs(10));
    }
}
