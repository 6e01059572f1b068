//! Configuration management for ctfboard.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::controller::Screen;
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "ctfboard";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "scoreboard.db";

/// Record key holding the participant list.
pub const DEFAULT_PARTICIPANTS_KEY: &str = "ctfParticipants";

/// Record key holding the result list.
pub const DEFAULT_RESULTS_KEY: &str = "ctfResults";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CTFBOARD_`, sections separated
///    by `__`, e.g. `CTFBOARD_UI__STATUS_TIMEOUT_MS=2000`)
/// 2. TOML config file at `~/.config/ctfboard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Interactive session configuration.
    pub ui: UiConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/ctfboard/scoreboard.db`
    pub database_path: Option<PathBuf>,
    /// Record key for the participant list.
    pub participants_key: String,
    /// Record key for the result list.
    pub results_key: String,
}

/// Interactive session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long a status message stays visible, in milliseconds.
    pub status_timeout_ms: u64,
    /// Screen shown when a session starts.
    pub default_screen: Screen,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Resolved to the data dir at runtime
            participants_key: DEFAULT_PARTICIPANTS_KEY.to_string(),
            results_key: DEFAULT_RESULTS_KEY.to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            status_timeout_ms: 5000,
            default_screen: Screen::Participants,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CTFBOARD_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let keys = [
            ("participants_key", &self.storage.participants_key),
            ("results_key", &self.storage.results_key),
        ];
        for (name, key) in keys {
            if key.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must not be empty"),
                });
            }
        }

        if self.storage.participants_key == self.storage.results_key {
            return Err(Error::ConfigValidation {
                message: format!(
                    "participants_key and results_key must differ (both are '{}')",
                    self.storage.results_key
                ),
            });
        }

        if self.ui.status_timeout_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "status_timeout_ms must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the status message timeout as a Duration.
    #[must_use]
    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.ui.status_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.storage.participants_key, "ctfParticipants");
        assert_eq!(config.storage.results_key, "ctfResults");
        assert_eq!(config.ui.status_timeout_ms, 5000);
        assert_eq!(config.ui.default_screen, Screen::Participants);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_key() {
        let mut config = Config::default();
        config.storage.results_key = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("results_key"));
    }

    #[test]
    fn test_validate_identical_keys() {
        let mut config = Config::default();
        config.storage.results_key = config.storage.participants_key.clone();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("must differ"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.ui.status_timeout_ms = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("status_timeout_ms"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("scoreboard.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/board.db"));

        assert_eq!(config.database_path(), PathBuf::from("/custom/path/board.db"));
    }

    #[test]
    fn test_status_timeout() {
        assert_eq!(
            Config::default().status_timeout(),
            Duration::from_millis(5000)
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("ctfboard"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "ctfboard_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[ui]\nstatus_timeout_ms = 1500\ndefault_screen = \"leaderboard\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.ui.status_timeout_ms, 1500);
        assert_eq!(config.ui.default_screen, Screen::Leaderboard);
        assert_eq!(config.storage, StorageConfig::default());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "ctfboard_config_invalid_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[ui]\nstatus_timeout_ms = 0\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("participants_key"));
        assert!(json.contains("\"participants\""));
    }
}
