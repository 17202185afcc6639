//! Asset service connection settings

use serde::{Deserialize, Serialize};

/// Connection settings for the Snipe-IT instance.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL, with or without a trailing `/api/v1`
    pub url: String,
    /// Personal API token sent as a bearer credential
    pub api_key: String,
    pub verify_ssl: bool,
    /// Per-request timeout
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            verify_ssl: true,
            timeout_seconds: 30,
        }
    }
}

// The token must never reach log output.
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}
