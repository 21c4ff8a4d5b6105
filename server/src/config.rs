use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::Level;

use crate::GAME_PAGE;

/// Configuration for the [crate::Api] server, usually read from YAML.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_blind_unit_secs")]
    pub blind_unit_secs: u64,
    /// Path of an HTML page served at `/game`; the bundled page when unset.
    #[serde(default)]
    pub game_page: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
}

pub struct ValidatedConfig {
    pub port: u16,
    pub database: PathBuf,
    pub log_level: Level,
    pub blind_unit: Duration,
    pub game_page: String,
}

fn default_port() -> u16 {
    5000
}

fn default_database() -> String {
    "game.db.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_blind_unit_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            database: default_database(),
            log_level: default_log_level(),
            blind_unit_secs: default_blind_unit_secs(),
            game_page: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.blind_unit_secs == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "blind_unit_secs",
                value: self.blind_unit_secs,
            });
        }

        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        let game_page = match &self.game_page {
            Some(path) => fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?,
            None => GAME_PAGE.to_string(),
        };

        Ok(ValidatedConfig {
            port: self.port,
            database: PathBuf::from(self.database),
            log_level,
            blind_unit: Duration::from_secs(self.blind_unit_secs),
            game_page,
        })
    }
}
