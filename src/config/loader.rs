//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::RouterConfig;
use crate::config::validation::validate_config;
use crate::error::ConfigError;

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = RouterConfig::from_toml_str(&content)?;
    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

impl RouterConfig {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = toml::from_str(content)?;
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}
