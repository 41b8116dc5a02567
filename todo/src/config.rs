//! Runtime configuration.
//!
//! Values come from the application; [`TodoConfig::from_env`] is a
//! convenience for the binary.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the snapshot directory
pub const STORAGE_DIR_VAR: &str = "TODO_STORAGE_DIR";
/// Environment variable naming the snapshot key
pub const STORAGE_KEY_VAR: &str = "TODO_STORAGE_KEY";
/// Environment variable naming the task API base URL
pub const API_URL_VAR: &str = "TODO_API_URL";
/// Environment variable holding the shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_VAR: &str = "TODO_SHUTDOWN_TIMEOUT_SECS";

/// Errors from reading configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable was set to something unusable
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}

/// Task list store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// Directory holding the snapshot file.
    ///
    /// Default: `.todo-store`
    pub storage_dir: PathBuf,

    /// Key the task list is stored under.
    ///
    /// Default: `todos`
    pub storage_key: String,

    /// Base URL of the remote task API (e.g., "https://api.example.com").
    ///
    /// Default: `http://localhost:3000`
    pub api_base_url: String,

    /// How long to wait for in-flight remote updates on shutdown.
    ///
    /// Default: 5 seconds
    pub shutdown_timeout: Duration,
}

impl TodoConfig {
    /// Read configuration from the process environment
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but cannot be used.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from any variable source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but cannot be used.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(STORAGE_DIR_VAR) {
            config.storage_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup(STORAGE_KEY_VAR) {
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    var: STORAGE_KEY_VAR,
                    value: key,
                });
            }
            config.storage_key = key;
        }
        if let Some(url) = lookup(API_URL_VAR) {
            config.api_base_url = url;
        }
        if let Some(secs) = lookup(SHUTDOWN_TIMEOUT_VAR) {
            let parsed = secs
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: SHUTDOWN_TIMEOUT_VAR,
                    value: secs.clone(),
                })?;
            config.shutdown_timeout = Duration::from_secs(parsed);
        }

        Ok(config)
    }

    /// Set the snapshot directory.
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// Set the snapshot key.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the task API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the shutdown timeout.
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".todo-store"),
            storage_key: crate::snapshot::DEFAULT_SNAPSHOT_KEY.to_string(),
            api_base_url: "http://localhost:3000".to_string(),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}
