//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::transport::HttpTransportConfig;
use crate::viewer::ViewerConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub viewer: ViewerSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log server connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,

    #[serde(default = "default_history_path")]
    pub history_path: String,

    #[serde(default = "default_update_path")]
    pub update_path: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_history_path() -> String {
    "/history.js".to_string()
}

fn default_update_path() -> String {
    "/update.js".to_string()
}

fn default_request_timeout() -> u64 {
    60_000 // long-polled updates can sit open for a while
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            history_path: default_history_path(),
            update_path: default_update_path(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    pub fn transport_config(&self) -> HttpTransportConfig {
        HttpTransportConfig {
            base_url: self.url.clone(),
            history_path: self.history_path.clone(),
            update_path: self.update_path.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Transcript display settings
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerSettings {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Show time labels in UTC instead of local time
    #[serde(default)]
    pub utc: bool,
}

fn default_poll_interval() -> u64 {
    1000
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            utc: false,
        }
    }
}

impl ViewerSettings {
    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            poll_interval_ms: self.poll_interval_ms,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// Only parses; call [`Config::validate`] once all overrides are applied.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_overrides(path, |key| std::env::var(key).ok())
    }

    /// Load a file, apply overrides from `lookup`, then validate
    pub fn load_with_overrides<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load(path)?;
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// First config file present in the default locations
    pub fn default_path() -> Option<PathBuf> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("ircview").join("config.toml")),
            Some(PathBuf::from("/etc/ircview/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        config_paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Load from default locations or environment
    ///
    /// A config file that exists but cannot be loaded is an error, not a
    /// silent fallback to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_with_env(&path),
            None => Self::from_env(),
        }
    }

    /// Reject settings the viewer cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewer.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "viewer.poll_interval_ms must be positive".to_string(),
            ));
        }
        if self.server.url.is_empty() {
            return Err(ConfigError::Invalid("server.url must be set".to_string()));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `IRCVIEW_*` overrides looked up through `lookup`
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("IRCVIEW_SERVER_URL") {
            self.server.url = url;
        }
        if let Some(timeout) = lookup("IRCVIEW_REQUEST_TIMEOUT_MS") {
            if let Ok(t) = timeout.parse() {
                self.server.request_timeout_ms = t;
            }
        }

        if let Some(interval) = lookup("IRCVIEW_POLL_INTERVAL_MS") {
            if let Ok(i) = interval.parse() {
                self.viewer.poll_interval_ms = i;
            }
        }

        if let Some(level) = lookup("IRCVIEW_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("IRCVIEW_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# ircview Configuration
#
# Environment variables override these settings:
# - IRCVIEW_SERVER_URL
# - IRCVIEW_REQUEST_TIMEOUT_MS
# - IRCVIEW_POLL_INTERVAL_MS
# - IRCVIEW_LOG_LEVEL
# - IRCVIEW_LOG_FORMAT

[server]
# Log server base URL
url = "http://localhost:8080"

# Endpoint returning the history backlog as a JSON array
history_path = "/history.js"

# Endpoint returning the next event as a JSON object
update_path = "/update.js"

# Request timeout (ms); updates are long-polled
request_timeout_ms = 60000

[viewer]
# Delay between polls (ms)
poll_interval_ms = 1000

# Show times in UTC instead of local time
utc = false

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
