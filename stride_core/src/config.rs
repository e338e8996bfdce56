//! Configuration file support for Stride.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/stride/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub paces: PacesConfig,

    #[serde(default)]
    pub upload: UploadConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Named training paces (`M:SS` per km)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PacesConfig {
    #[serde(default = "default_margin_sec")]
    pub default_margin_sec: u32,

    #[serde(default = "default_zones")]
    pub zones: BTreeMap<String, String>,
}

impl Default for PacesConfig {
    fn default() -> Self {
        Self {
            default_margin_sec: default_margin_sec(),
            zones: default_zones(),
        }
    }
}

/// Upload behaviour
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Attempts per upload/schedule call before the workout is marked failed
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir().join(".local/share"));
    base.join("stride")
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_margin_sec() -> u32 {
    5
}

fn default_zones() -> BTreeMap<String, String> {
    crate::zones::DEFAULT_ZONE_PACES.clone()
}

fn default_max_attempts() -> u32 {
    2
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject settings that would make every upload or pace lookup fail
    pub fn validate(&self) -> Result<()> {
        if self.upload.max_attempts == 0 {
            return Err(Error::Config("upload.max_attempts must be at least 1".into()));
        }
        for (name, pace) in &self.paces.zones {
            crate::pace::parse_pace_secs(pace)
                .map_err(|e| Error::Config(format!("paces.zones.{}: {}", name, e)))?;
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir().join(".config"));
        base.join("stride").join("config.toml")
    }

    /// Where the file outbox lives
    pub fn outbox_path(&self) -> PathBuf {
        self.data.data_dir.join("outbox.jsonl")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    ///
    /// Written to a temp file in the same directory and renamed into place.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Config(format!("Config path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
