//! Application configuration.
//!
//! Configuration is layered: an optional `colloquy.toml` file provides the
//! base values, then environment variables override the backend settings.
//! The file is deliberately small (chat limits and backend connection
//! parameters) and everything has a sensible default except the API key.

use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ColloquyError, Result};

/// Environment variable holding the backend API key.
pub const ENV_API_KEY: &str = "DIFY_API_KEY";
/// Environment variable overriding the backend base URL.
pub const ENV_BASE_URL: &str = "DIFY_BASE_URL";
/// Environment variable overriding the request timeout in seconds.
pub const ENV_TIMEOUT: &str = "DIFY_TIMEOUT";

const DEFAULT_BASE_URL: &str = "https://api.dify.ai/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_MESSAGE_LENGTH: usize = 1000;

/// Connection settings for the chat-completion backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Bearer token for the backend API
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Applies environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(key) = env::var(ENV_API_KEY) {
            if !key.is_empty() {
                self.api_key = key;
            }
        }
        if let Ok(url) = env::var(ENV_BASE_URL) {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        if let Ok(secs) = env::var(ENV_TIMEOUT) {
            if let Ok(secs) = secs.parse::<u64>() {
                self.timeout_secs = secs;
            }
        }
    }

    /// Validates the connection settings.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the API key or base URL is empty, or the
    /// timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ColloquyError::validation(format!(
                "backend API key is not set (export {ENV_API_KEY})"
            )));
        }
        if self.base_url.is_empty() {
            return Err(ColloquyError::validation("backend base URL must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(ColloquyError::validation("backend timeout must be positive"));
        }
        Ok(())
    }
}

/// Limits applied to user-submitted chat input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum accepted message length in characters
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    /// Substrings that make a message unacceptable
    #[serde(default)]
    pub denylist: Vec<String>,
}

fn default_max_message_length() -> usize {
    DEFAULT_MAX_MESSAGE_LENGTH
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_length: default_max_message_length(),
            denylist: Vec::new(),
        }
    }
}

/// Root configuration for the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColloquyConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl ColloquyConfig {
    /// Loads configuration from an optional TOML file, then applies
    /// environment overrides for the backend section.
    ///
    /// A missing file is not an error: defaults plus environment variables
    /// are enough to run.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    ColloquyError::validation(format!(
                        "failed to read config file {}: {e}",
                        path.display()
                    ))
                })?;
                toml::from_str(&raw).map_err(|e| {
                    ColloquyError::validation(format!(
                        "failed to parse config file {}: {e}",
                        path.display()
                    ))
                })?
            }
            _ => Self::default(),
        };
        config.backend.apply_env();
        Ok(config)
    }
}
