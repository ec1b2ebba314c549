//! Configuration parsing from TOML text.

use crate::config::schema::ProxyConfig;
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Deserialize a configuration from TOML text. Missing sections fall back to
/// their defaults.
pub fn load_config_str(content: &str) -> Result<ProxyConfig, ConfigError> {
    let config: ProxyConfig = toml::from_str(content)?;
    Ok(config)
}
