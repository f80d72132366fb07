use crate::error::{PactopacError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Two hours between update checks
pub const DEFAULT_INTERVAL_SECS: u64 = 2 * 60 * 60;

/// Location of the live pacman database
pub const DEFAULT_DB_PATH: &str = "/var/lib/pacman";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between two update checks, baked into the launcher at install time
    pub interval_secs: u64,

    /// Also count pending Flatpak updates
    pub include_flatpak: bool,

    /// Application name shown by the notification daemon
    pub app_name: String,

    /// Live pacman database the snapshot is taken from
    pub db_path: PathBuf,
}

impl Config {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            include_flatpak: false,
            app_name: "PacToPac".to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }

    /// Get the config file path
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PactopacError::Config("Could not determine config directory".to_string()))?
            .join("pactopac");

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, or fall back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| PactopacError::Config(format!("Failed to parse config: {}", e)))?;

        if config.interval_secs == 0 {
            return Err(PactopacError::Config("interval_secs must be greater than zero".to_string()));
        }

        Ok(config)
    }

    /// Load config for the background checker.
    ///
    /// The daemon runs unattended, so an unreadable file falls back to
    /// defaults instead of stopping it.
    pub fn load_or_default() -> Self {
        match Self::config_file_path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(e) => {
                warn!("{}; using default configuration", e);
                Self::new()
            }
        }
    }

    pub fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            warn!("Ignoring {}: {}; using default configuration", path.display(), e);
            Self::new()
        })
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| PactopacError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Read a single key as a display string
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "interval_secs" => Some(self.interval_secs.to_string()),
            "include_flatpak" => Some(self.include_flatpak.to_string()),
            "app_name" => Some(self.app_name.clone()),
            "db_path" => Some(self.db_path.display().to_string()),
            _ => None,
        }
    }

    /// Set a single key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "interval_secs" => {
                let secs: u64 = value
                    .parse()
                    .map_err(|_| PactopacError::Config("Invalid number for interval_secs".into()))?;
                if secs == 0 {
                    return Err(PactopacError::Config("interval_secs must be greater than zero".into()));
                }
                self.interval_secs = secs;
            }
            "include_flatpak" => {
                self.include_flatpak = value
                    .parse()
                    .map_err(|_| PactopacError::Config("Invalid boolean for include_flatpak".into()))?;
            }
            "app_name" => self.app_name = value.to_string(),
            "db_path" => self.db_path = PathBuf::from(value),
            _ => return Err(PactopacError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }

    pub const KEYS: [&'static str; 4] = ["interval_secs", "include_flatpak", "app_name", "db_path"];
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
