//! Configuration for jsonform.
//!
//! Settings are read from `~/.config/jsonform/config.toml`. Every field is
//! optional; missing fields take their defaults and command-line flags override
//! whatever the file says.
//!
//! # Example
//!
//! ```
//! use jsonform::config::Config;
//!
//! let config: Config = toml::from_str("indent_size = 4").unwrap();
//! assert_eq!(config.indent_size, 4);
//! assert_eq!(config.separator, '.');
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::JsonFormError;
use crate::types::Separator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Spaces per indentation level in exported JSON; 0 exports compact JSON
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Character between keys in paths
    #[serde(default = "default_separator")]
    pub separator: char,

    /// Start with the sample document instead of an empty object
    #[serde(default)]
    pub load_sample: bool,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_indent_size() -> usize {
    2
}

fn default_separator() -> char {
    '.'
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            separator: default_separator(),
            load_sample: false,
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/jsonform/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("jsonform");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        Self::load_from(&config_path).unwrap_or_else(|err| {
            tracing::warn!(path = %config_path.display(), error = %err, "ignoring unreadable config");
            Self::default()
        })
    }

    /// Loads configuration from an explicit file, reporting any problem.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .separator()
            .with_context(|| format!("Invalid separator in config file {}", path.display()))?;
        Ok(config)
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    pub fn separator(&self) -> Result<Separator, JsonFormError> {
        Separator::checked(self.separator)
    }
}
