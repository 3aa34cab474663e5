use std::env;
use std::fs;
use std::path::Path;

use ballot_common::Identity;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur in configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidEnvVar(String, String),

    #[error("Failed to read file: {0}")]
    FileReadError(String),

    #[error("Failed to parse YAML: {0}")]
    YamlParseError(#[from] serde_yaml::Error),

    #[error("Invalid administrator identity: {0}")]
    InvalidAdmin(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Initial holder of the administrator role, as hex
    pub admin: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Refuse to finalize proposals whose total is below quorum
    #[serde(default)]
    pub enforce_quorum: bool,
    /// Capacity of the event channel handed to external indexers
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_event_buffer() -> usize {
    1024
}

impl EngineConfig {
    /// Configuration with defaults for everything but the administrator
    pub fn new(admin: Identity) -> Self {
        Self {
            admin: admin.to_hex(),
            log_level: default_log_level(),
            enforce_quorum: false,
            event_buffer: default_event_buffer(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `BALLOT_CONFIG_FILE`, when it points at an existing file, wins over
    /// the individual variables.
    pub fn from_env() -> Result<Self> {
        if let Ok(config_path) = env::var("BALLOT_CONFIG_FILE") {
            if Path::new(&config_path).exists() {
                debug!("Loading engine config from {}", config_path);
                return Self::from_file(&config_path);
            }
        }

        let admin = env::var("BALLOT_ADMIN")
            .map_err(|e| ConfigError::EnvVarNotFound(format!("BALLOT_ADMIN: {}", e)))?;

        let log_level = env::var("BALLOT_LOG_LEVEL").unwrap_or_else(|_| default_log_level());

        let enforce_quorum = match env::var("BALLOT_ENFORCE_QUORUM") {
            Ok(v) => v
                .parse::<bool>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar("BALLOT_ENFORCE_QUORUM".to_string(), e.to_string())
                })?,
            Err(_) => false,
        };

        let event_buffer = match env::var("BALLOT_EVENT_BUFFER") {
            Ok(v) => v
                .parse::<usize>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar("BALLOT_EVENT_BUFFER".to_string(), e.to_string())
                })?,
            Err(_) => default_event_buffer(),
        };

        let config = EngineConfig {
            admin,
            log_level,
            enforce_quorum,
            event_buffer,
        };
        config.admin_identity()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileReadError(format!("Failed to read {}: {}", path, e)))?;

        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(contents)?;
        config.admin_identity()?;
        Ok(config)
    }

    /// The configured administrator; must parse and must not be null
    pub fn admin_identity(&self) -> Result<Identity> {
        let admin = Identity::from_hex(&self.admin)
            .map_err(|e| ConfigError::InvalidAdmin(format!("{}: {}", self.admin, e)))?;
        if admin.is_null() {
            return Err(ConfigError::InvalidAdmin("null identity".to_string()));
        }
        Ok(admin)
    }
}
