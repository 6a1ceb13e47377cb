//! Configuration management for tagpick.
//!
//! Settings are read from `config.toml` in the platform config directory
//! (for example `~/.config/tagpick/config.toml` on Linux). A missing file is
//! not an error: defaults are used instead.

mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use settings::{Settings, DEFAULT_PLACEHOLDER};

/// Name of the configuration file.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// The config file exists but could not be read.
    #[error("Failed to read configuration: {0}")]
    ReadError(#[from] std::io::Error),

    /// The config file is not valid TOML for `Settings`.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A setting has an invalid value.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Get the default configuration file path.
pub fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("tagpick").join(CONFIG_FILE_NAME))
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Load settings from a specific file.
    ///
    /// Returns defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&contents)?;
        settings.validate()?;
        debug!(path = %path.display(), ?settings, "Loaded configuration");
        Ok(settings)
    }
}
