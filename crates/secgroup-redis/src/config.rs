//! Rule cache connection configuration.
//!
//! Loaded from a TOML file, default location `/etc/secgroup/redis.toml`:
//!
//! ```toml
//! [redis]
//! host = "10.0.0.5"
//! port = 6379
//! db = 0
//! connection_timeout_secs = 5
//! ```
//!
//! Every field is optional and falls back to its default.

use crate::error::{Result, SecurityGroupError};
use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/secgroup/redis.toml";

/// Redis connection settings for the rule cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis server hostname or IP
    #[serde(default = "default_host")]
    pub host: String,

    /// Redis server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database number holding rule documents
    #[serde(default)]
    pub db: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Bound on establishing a connection
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// Bound on waiting for a command reply
    #[serde(default = "default_response_timeout")]
    pub response_timeout_secs: u64,

    /// Reconnection attempts before a connect or reconnect is reported failed
    #[serde(default = "default_connection_retries")]
    pub connection_retries: usize,
}

/// Complete configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecgroupConfig {
    #[serde(default)]
    pub redis: RedisConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_connection_timeout() -> u64 {
    5
}

fn default_response_timeout() -> u64 {
    5
}

fn default_connection_retries() -> usize {
    2
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db: 0,
            password: None,
            connection_timeout_secs: default_connection_timeout(),
            response_timeout_secs: default_response_timeout(),
            connection_retries: default_connection_retries(),
        }
    }
}

impl RedisConfig {
    /// Creates a configuration for the given server with default timeouts.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Get connection timeout as Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Get response timeout as Duration
    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }

    /// Returns the connection parameters for the redis client.
    pub(crate) fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                db: self.db,
                password: self.password.clone(),
                ..Default::default()
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(SecurityGroupError::Config("host must not be empty".to_string()));
        }

        if self.port == 0 {
            return Err(SecurityGroupError::Config("port must be > 0".to_string()));
        }

        if self.db < 0 {
            return Err(SecurityGroupError::Config("db must be >= 0".to_string()));
        }

        if self.connection_timeout_secs == 0 || self.response_timeout_secs == 0 {
            return Err(SecurityGroupError::Config(
                "timeouts must be > 0 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

impl SecgroupConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => {
                let config: Self = toml::from_str(&content).map_err(|e| {
                    SecurityGroupError::Config(format!(
                        "Failed to parse config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                config.redis.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(SecurityGroupError::Io(e)),
        }
    }
}
