//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then `<config_dir>/dextui/config.toml`,
//! then `DEXTUI_*` environment variables, then command-line flags (applied by
//! `main`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Language used for stat labels and user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

/// What to do when one detail call of a page fan-out fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FanOut {
    /// Fail the whole page.
    #[default]
    Strict,
    /// Log and skip the failed item.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub page_size: usize,
    pub locale: Locale,
    pub fan_out: FanOut,
    pub max_concurrency: usize,
    /// Per-request timeout; unset means no deadline.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            locale: Locale::En,
            fan_out: FanOut::Strict,
            max_concurrency: 8,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// `~/.config/dextui/config.toml` or the platform equivalent.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("dextui").join("config.toml")
    }

    /// Loads the default config file (if any) and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Like [`Config::load`] but reads `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?
        } else {
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies `DEXTUI_BASE_URL` and `DEXTUI_PAGE_SIZE`. Unparseable values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DEXTUI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(size) = lookup("DEXTUI_PAGE_SIZE").and_then(|s| s.parse::<usize>().ok()) {
            self.page_size = size;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "page_size must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, self.page_size
                ),
            });
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_concurrency must be at least 1".to_string(),
            });
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                message: format!("base_url '{}' is not an http(s) URL", self.base_url),
            });
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
