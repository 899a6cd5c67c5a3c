//! Configuration settings management
//!
//! Configuration comes from defaults overridden by environment variables.
//! Command-line flags are layered on top by the CLI module.

use crate::error::{KvCertError, Result};
use crate::utils::network::NetworkConfig;
use std::time::Duration;

/// Environment variable holding the fallback vault address
pub const VAULT_URL_ENV: &str = "AZURE_KEYVAULT_URL";

/// Key Vault REST API version used for all requests
pub const DEFAULT_API_VERSION: &str = "7.4";

#[derive(Debug, Clone)]
pub struct Config {
    /// Vault URI or short name from `AZURE_KEYVAULT_URL`
    pub vault_url: Option<String>,
    pub api_version: String,
    pub network: NetworkConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vault_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            network: NetworkConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.api_version.trim().is_empty() {
            return Err(KvCertError::config("API version must not be empty"));
        }

        if self.network.connect_timeout.is_zero() {
            return Err(KvCertError::config("Connect timeout must be greater than zero"));
        }

        if self.network.request_timeout.is_zero() {
            return Err(KvCertError::config("Request timeout must be greater than zero"));
        }

        Ok(())
    }
}

/// Load configuration with priority order:
/// 1. Command-line flags (handled by clap)
/// 2. Environment variables
/// 3. Default values
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();
    load_from_env(&mut config);
    config.validate()?;
    Ok(config)
}

fn load_from_env(config: &mut Config) {
    load_from_source(config, |key| std::env::var(key).ok());
}

/// Apply overrides from any key/value source. Unparseable values keep the default.
pub(crate) fn load_from_source<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(VAULT_URL_ENV) {
        if !value.trim().is_empty() {
            config.vault_url = Some(value);
        }
    }

    if let Some(value) = lookup("KVCERT_API_VERSION") {
        config.api_version = value;
    }

    if let Some(value) = lookup("KVCERT_CONNECT_TIMEOUT") {
        if let Ok(seconds) = value.parse::<u64>() {
            config.network.connect_timeout = Duration::from_secs(seconds);
        }
    }

    if let Some(value) = lookup("KVCERT_REQUEST_TIMEOUT") {
        if let Ok(seconds) = value.parse::<u64>() {
            config.network.request_timeout = Duration::from_secs(seconds);
        }
    }
}
