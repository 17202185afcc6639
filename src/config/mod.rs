//! Configuration module for the Sniper agent
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`SNIPER_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use sniper::config::AgentConfig;
//!
//! let toml = r#"
//! [server]
//! url = "https://assets.example.com"
//! api_key = "token"
//!
//! [defaults]
//! naming_convention = "IT-N"
//! "#;
//! let config: AgentConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.defaults.naming_convention, "IT-N");
//! assert_eq!(config.defaults.status_id, 2);
//! assert!(config.validate().is_ok());
//! ```

pub mod defaults;
pub mod error;
pub mod fields;
pub mod logging;
pub mod server;

pub use defaults::DefaultsConfig;
pub use error::ConfigError;
pub use fields::{CustomFieldsConfig, FieldConfig, DEFAULT_VOLATILE_FIELDS};
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;

use crate::tagging::NamingPattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sniper.toml";

/// Unified configuration for the agent.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AgentConfig {
    /// Snipe-IT connection settings
    pub server: ServerConfig,
    /// Reference ids and tag conventions
    pub defaults: DefaultsConfig,
    /// Computer custom field mappings
    pub custom_fields: CustomFieldsConfig,
    /// Monitor custom field mappings, keyed by monitor attribute
    pub monitor_custom_fields: BTreeMap<String, FieldConfig>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AgentConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports SNIPER_* environment variables for connection and logging settings.
    /// Invalid values are silently ignored (the file value is kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("SNIPER_SERVER_URL") {
            self.server.url = url;
        }
        if let Ok(key) = std::env::var("SNIPER_API_KEY") {
            self.server.api_key = key;
        }
        if let Ok(verify) = std::env::var("SNIPER_VERIFY_SSL") {
            match verify.to_lowercase().as_str() {
                "true" | "1" | "yes" => self.server.verify_ssl = true,
                "false" | "0" | "no" => self.server.verify_ssl = false,
                _ => {}
            }
        }

        if let Ok(level) = std::env::var("SNIPER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("SNIPER_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.server.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::validation(
                "server.url",
                "must start with http:// or https://",
            ));
        }
        if self.server.api_key.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.api_key",
                "API key cannot be empty",
            ));
        }
        if self.server.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "server.timeout_seconds",
                "timeout must be non-zero",
            ));
        }

        for (field, id) in self.defaults.ids() {
            if id == 0 {
                return Err(ConfigError::validation(
                    format!("defaults.{}", field),
                    "id must be non-zero",
                ));
            }
        }

        for (field, pattern) in [
            ("naming_convention", &self.defaults.naming_convention),
            (
                "monitor_naming_convention",
                &self.defaults.monitor_naming_convention,
            ),
        ] {
            if pattern.trim().is_empty() {
                continue;
            }
            NamingPattern::parse(pattern).map_err(|e| {
                ConfigError::validation(format!("defaults.{}", field), e.to_string())
            })?;
        }

        let computer_fields = self
            .custom_fields
            .iter()
            .map(|(key, field)| (format!("custom_fields.{}", key), field));
        let monitor_fields = self
            .monitor_custom_fields
            .iter()
            .map(|(key, field)| (format!("monitor_custom_fields.{}", key), field));
        for (path, field) in computer_fields.chain(monitor_fields) {
            if !field.enabled {
                continue;
            }
            if field.db_column.trim().is_empty() {
                return Err(ConfigError::validation(
                    format!("{}.db_column", path),
                    "db_column cannot be empty",
                ));
            }
            if field.display_name.trim().is_empty() {
                return Err(ConfigError::validation(
                    format!("{}.display_name", path),
                    "display_name cannot be empty",
                ));
            }
        }

        Ok(())
    }
}
