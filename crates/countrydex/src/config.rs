//! Configuration management for countrydex.
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

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "countrydex";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "favourites.db";

/// Default REST Countries endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://restcountries.com/v3.1/all";

/// Default flag CDN base URL.
pub const DEFAULT_FLAG_CDN: &str = "https://flagcdn.com";

/// Key under which the favourites mapping is stored.
pub const DEFAULT_FAVOURITES_KEY: &str = "country_favourites_v1";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `COUNTRYDEX_`, sections split on `__`)
/// 2. TOML config file at `~/.config/countrydex/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Country API configuration.
    pub api: ApiConfig,
    /// Flag image configuration.
    pub flags: FlagConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Country API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Endpoint returning the full country list.
    pub endpoint: String,
    /// Fields requested from the endpoint.
    pub fields: Vec<String>,
    /// Request timeout in seconds. 0 disables the timeout.
    pub timeout_secs: u64,
}

/// Flag image configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagConfig {
    /// Base URL of the flag CDN.
    pub cdn_base: String,
    /// Image width in pixels.
    pub width: u32,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/countrydex/favourites.db`
    pub database_path: Option<PathBuf>,
    /// Key the favourites mapping is stored under.
    pub favourites_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            fields: default_fields(),
            timeout_secs: 0,
        }
    }
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            cdn_base: DEFAULT_FLAG_CDN.to_string(),
            width: 160,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            favourites_key: DEFAULT_FAVOURITES_KEY.to_string(),
        }
    }
}

/// Fields the loader needs from each upstream record.
fn default_fields() -> Vec<String> {
    ["name", "cca2", "region", "capital", "population"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Config {
    /// Load configuration, reading `config_path` or the default config file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("COUNTRYDEX_").split("__"));

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
        let endpoint = self.api.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::ConfigValidation {
                message: "api.endpoint must not be empty".to_string(),
            });
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::ConfigValidation {
                message: format!("api.endpoint must be an http(s) URL: {endpoint}"),
            });
        }

        if self.api.fields.is_empty() {
            return Err(Error::ConfigValidation {
                message: "api.fields must list at least one field".to_string(),
            });
        }

        if self.flags.width == 0 {
            return Err(Error::ConfigValidation {
                message: "flags.width must be greater than 0".to_string(),
            });
        }

        if self.storage.favourites_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.favourites_key must not be empty".to_string(),
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

    /// Get the request timeout, if one is configured.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.api.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.api.timeout_secs))
        }
    }

    /// Get the comma-joined field list sent as the `fields` query parameter.
    #[must_use]
    pub fn fields_param(&self) -> String {
        self.api.fields.join(",")
    }
}
