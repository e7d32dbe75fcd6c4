//! Configuration management for the lockup gate

use crate::error::{LockupError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The native token of the chain. This MUST match the mint denom, it is the
/// default locked token denom seeded at genesis.
pub const NATIVE_TOKEN: &str = "aalthea";

/// Human readable prefix of native bech32 account addresses.
pub const DEFAULT_ACCOUNT_PREFIX: &str = "althea";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
    #[serde(default = "default_native_denom")]
    pub native_denom: String,
    #[serde(default = "default_account_prefix")]
    pub account_prefix: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            native_denom: default_native_denom(),
            account_prefix: default_account_prefix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    pub fn tracing_level(&self) -> Result<tracing::Level> {
        self.level
            .parse::<tracing::Level>()
            .map_err(|_| LockupError::Config(format!("unknown log level '{}'", self.level)))
    }
}

/// Loads `config.toml` from the working directory, falling back to defaults
/// when the file is absent.
pub fn load_config() -> Result<Config> {
    let config_str = fs::read_to_string(DEFAULT_CONFIG_PATH).unwrap_or_default();
    parse_config(&config_str)
}

pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config> {
    let config_str = fs::read_to_string(path)?;
    parse_config(&config_str)
}

fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = if config_str.trim().is_empty() {
        Config::default()
    } else {
        toml::from_str(config_str)?
    };

    if config.database.path.is_empty() {
        return Err(LockupError::Config(
            "database.path must be set in config.toml".to_string(),
        ));
    }
    if config.chain.native_denom.is_empty() {
        return Err(LockupError::Config(
            "chain.native_denom must be set in config.toml".to_string(),
        ));
    }
    if config.chain.account_prefix.is_empty() {
        return Err(LockupError::Config(
            "chain.account_prefix must be set in config.toml".to_string(),
        ));
    }
    config.logging.tracing_level()?;

    Ok(config)
}

fn default_chain_id() -> String {
    "althea_7357-1".to_string()
}

fn default_native_denom() -> String {
    NATIVE_TOKEN.to_string()
}

fn default_account_prefix() -> String {
    DEFAULT_ACCOUNT_PREFIX.to_string()
}

fn default_db_path() -> String {
    "./data/params.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
