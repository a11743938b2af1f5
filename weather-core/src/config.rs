use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherstack.com";
pub const DEFAULT_UNITS: &str = "m";
pub const DEFAULT_CITY: &str = "London";

/// Environment variable that takes precedence over the stored access key.
pub const ACCESS_KEY_ENV: &str = "WEATHERSTACK_ACCESS_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// access_key = "..."
/// default_city = "Berlin"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// weatherstack access key.
    pub access_key: Option<String>,

    /// Override for the API root, e.g. a local mock server.
    pub base_url: Option<String>,

    /// Unit code sent as `units`; weatherstack uses "m" for metric.
    pub units: Option<String>,

    /// City fetched when the interactive view starts.
    pub default_city: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    /// The access key from the environment, if set, replaces the stored one.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_access_key_override(std::env::var(ACCESS_KEY_ENV).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
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
        let dirs = ProjectDirs::from("dev", "weatherstack", "weatherstack-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn apply_access_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.access_key = Some(key);
        }
    }

    pub fn set_access_key(&mut self, key: String) {
        self.access_key = Some(key);
    }

    /// Returns the access key, if one is configured and non-blank.
    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn units(&self) -> &str {
        self.units.as_deref().unwrap_or(DEFAULT_UNITS)
    }

    pub fn default_city(&self) -> &str {
        self.default_city
            .as_deref()
            .and_then(crate::model::normalize_city)
            .unwrap_or(DEFAULT_CITY)
    }
}
