//! Configuration management for fleetgrid
//!
//! Config stored at: ~/.config/fleetgrid/config.json

use std::path::PathBuf;
use std::time::Duration;

use fleetgrid_domain::service::filter_picker::DEFAULT_OVERBROAD_THRESHOLD;
use fleetgrid_types::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `server_url`
pub const SERVER_ENV: &str = "FLEETGRID_SERVER";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the board server
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Preference directory override
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Request timeout; absent means requests never time out
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Quiet period before horizontal snapping
    #[serde(default = "default_snap_quiet_ms")]
    pub snap_quiet_ms: u64,

    /// Saved visible-filter lists longer than this fall back to the default
    #[serde(default = "default_overbroad_threshold")]
    pub overbroad_filter_threshold: usize,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_snap_quiet_ms() -> u64 {
    120
}

fn default_overbroad_threshold() -> usize {
    DEFAULT_OVERBROAD_THRESHOLD
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            data_dir: None,
            request_timeout_secs: None,
            snap_quiet_ms: default_snap_quiet_ms(),
            overbroad_filter_threshold: default_overbroad_threshold(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("fleetgrid");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Directory holding preferences.json
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("fleetgrid");
        Ok(data_dir)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn snap_quiet_secs(&self) -> f64 {
        self.snap_quiet_ms as f64 / 1000.0
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Load, then apply the environment override
    pub fn load_effective() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env(std::env::var(SERVER_ENV).ok());
        Ok(config)
    }

    /// Apply a `FLEETGRID_SERVER` value; blank values are ignored
    pub fn apply_env(&mut self, server: Option<String>) {
        if let Some(url) = server.filter(|s| !s.trim().is_empty()) {
            self.server_url = url.trim().to_string();
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "FleetGrid Configuration")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;
        writeln!(f, "Server:           {}", self.server_url)?;
        writeln!(
            f,
            "Data dir:         {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(
            f,
            "Request timeout:  {}",
            self.request_timeout_secs
                .map(|s| format!("{}s", s))
                .unwrap_or_else(|| "(none)".to_string())
        )?;
        writeln!(f, "Snap quiet:       {}ms", self.snap_quiet_ms)?;
        writeln!(f, "Filter threshold: {}", self.overbroad_filter_threshold)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:      {}", path.display())?;
        }

        Ok(())
    }
}
