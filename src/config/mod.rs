//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`defaults`]: serde default values (endpoint, store path, intervals)
//! - [`validation`]: startup checks, collected into [`ValidationError`]s

mod defaults;
pub mod validation;

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub use validation::ValidationError;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Login identity and target channel.
    pub identity: Identity,
    /// Chat server endpoint.
    #[serde(default)]
    pub server: ServerConfig,
    /// Command store location and save cadence.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Command defaults.
    #[serde(default)]
    pub commands: CommandsConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        validation::validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

/// Who the bot logs in as and which channel it serves.
#[derive(Clone, Default, Deserialize)]
pub struct Identity {
    /// Login name (also the NICK).
    #[serde(default)]
    pub username: String,
    /// OAuth token, with or without the `oauth:` prefix.
    #[serde(default)]
    pub credential: String,
    /// Channel to join, with or without a leading `#`.
    #[serde(default)]
    pub channel_name: String,
}

impl Identity {
    pub fn new(
        username: impl Into<String>,
        credential: impl Into<String>,
        channel_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            credential: credential.into(),
            channel_name: channel_name.into(),
        }
    }

    /// Reject empty username, credential or channel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors = validation::validate_identity(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Channel name without the leading `#`.
    pub fn channel(&self) -> &str {
        let channel = self.channel_name.trim();
        channel.strip_prefix('#').unwrap_or(channel)
    }
}

// The credential must never reach the logs.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("credential", &"<redacted>")
            .field("channel_name", &self.channel_name)
            .finish()
    }
}

/// Chat server endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::default_host")]
    pub host: String,
    #[serde(default = "defaults::default_port")]
    pub port: u16,
    /// Use TLS (default: true).
    #[serde(default = "defaults::default_true")]
    pub tls: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::default_host(),
            port: defaults::default_port(),
            tls: true,
        }
    }
}

/// Command store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the JSON command file (default: "commands.json").
    #[serde(default = "defaults::default_store_path")]
    pub path: String,
    /// Seconds between periodic saves (default: 60).
    #[serde(default = "defaults::default_save_interval")]
    pub save_interval_secs: u64,
}

impl StorageConfig {
    pub fn save_interval(&self) -> Duration {
        Duration::from_secs(self.save_interval_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: defaults::default_store_path(),
            save_interval_secs: defaults::default_save_interval(),
        }
    }
}

/// Defaults applied to commands created from chat.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandsConfig {
    /// Cooldown for new text commands in seconds (default: 30).
    #[serde(default = "defaults::default_cooldown")]
    pub default_cooldown_secs: u64,
}

impl CommandsConfig {
    pub fn default_cooldown(&self) -> Duration {
        Duration::from_secs(self.default_cooldown_secs)
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            default_cooldown_secs: defaults::default_cooldown(),
        }
    }
}
