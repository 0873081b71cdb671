//! Persistent desktop configuration model and file-backed manager.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use wrike_api::config::DEFAULT_API_BASE;

const CONFIG_FILE_NAME: &str = "config.json";

fn default_api_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_panel_width() -> f64 {
    1200.0
}

fn default_panel_height() -> f64 {
    800.0
}

/// Application configuration persisted on disk: API root and board panel size.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_panel_width")]
    pub panel_width: f64,
    #[serde(default = "default_panel_height")]
    pub panel_height: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            panel_width: default_panel_width(),
            panel_height: default_panel_height(),
        }
    }
}

impl Config {
    /// Replaces blank or nonsensical values with defaults.
    pub fn normalized(mut self) -> Self {
        if self.api_base_url.trim().is_empty() {
            self.api_base_url = default_api_base_url();
        } else {
            self.api_base_url = self.api_base_url.trim().to_string();
        }
        if !(self.panel_width.is_finite() && self.panel_width >= 400.0) {
            self.panel_width = default_panel_width();
        }
        if !(self.panel_height.is_finite() && self.panel_height >= 300.0) {
            self.panel_height = default_panel_height();
        }
        self
    }
}

/// Loads and saves the configuration as JSON in the platform config directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Creates a manager bound to the platform-specific app config path.
    pub fn new() -> Self {
        let path = directories::ProjectDirs::from("com", "wrikeboard", "wrike-board")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        Self { path }
    }

    /// Loads config from disk, falling back to defaults on read/parse errors.
    pub fn load(&self) -> Config {
        let config = if self.path.exists() {
            let content = fs::read_to_string(&self.path).unwrap_or_default();
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            Config::default()
        };
        config.normalized()
    }

    /// Loads config, writing the defaults on first launch so there is a file
    /// to edit.
    pub fn load_or_init(&self) -> Config {
        if self.path.exists() {
            return self.load();
        }
        let config = Config::default();
        match self.save(&config) {
            Ok(()) => info!("Wrote default config to {}", self.path.display()),
            Err(err) => warn!("Failed to write default config: {}", err),
        }
        config
    }

    /// Persists config to disk, creating parent directories when needed.
    pub fn save(&self, config: &Config) -> Result<(), std::io::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigManager};
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        env::temp_dir().join(format!("wrike-board-tests-{name}-{nanos}/config.json"))
    }

    #[test]
    fn default_config_points_at_wrike_v4() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://www.wrike.com/api/v4");
        assert_eq!(config.panel_width, 1200.0);
        assert_eq!(config.panel_height, 800.0);
    }

    #[test]
    fn load_missing_file_returns_default() {
        let manager = ConfigManager {
            path: unique_path("missing"),
        };
        assert_eq!(manager.load(), Config::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = unique_path("roundtrip");
        let parent = path.parent().map(ToOwned::to_owned);

        let manager = ConfigManager { path: path.clone() };
        let config = Config {
            api_base_url: "https://app-eu.wrike.com/api/v4".to_string(),
            panel_width: 1440.0,
            panel_height: 900.0,
        };

        manager.save(&config).expect("save should succeed");
        assert_eq!(manager.load(), config);

        if let Some(parent) = parent {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn first_launch_writes_defaults_and_keeps_existing_files() {
        let path = unique_path("init");
        let parent = path.parent().map(ToOwned::to_owned);
        let manager = ConfigManager { path: path.clone() };

        assert_eq!(manager.load_or_init(), Config::default());
        assert!(path.exists());

        let edited = Config {
            panel_width: 1600.0,
            ..Config::default()
        };
        manager.save(&edited).expect("save should succeed");
        assert_eq!(manager.load_or_init(), edited);

        if let Some(parent) = parent {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn load_invalid_json_falls_back_to_default() {
        let path = unique_path("invalid");
        let parent = path.parent().expect("parent must exist");
        fs::create_dir_all(parent).expect("create temp directory");
        fs::write(&path, "not-valid-json").expect("write invalid config");

        let manager = ConfigManager { path: path.clone() };
        assert_eq!(manager.load(), Config::default());

        let _ = fs::remove_dir_all(parent);
    }

    #[test]
    fn partial_file_is_normalized() {
        let path = unique_path("partial");
        let parent = path.parent().expect("parent must exist");
        fs::create_dir_all(parent).expect("create temp directory");
        fs::write(&path, r#"{"api_base_url": "  ", "panel_width": 10}"#).expect("write config");

        let manager = ConfigManager { path: path.clone() };
        let loaded = manager.load();
        assert_eq!(loaded.api_base_url, "https://www.wrike.com/api/v4");
        assert_eq!(loaded.panel_width, 1200.0);
        assert_eq!(loaded.panel_height, 800.0);

        let _ = fs::remove_dir_all(parent);
    }
}
