//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file, then environment
//! variables override individual values:
//!
//! | Variable | Overrides |
//! |---|---|
//! | `BIZTIME_CONFIG` | path of the YAML file (default `biztime.yaml`, optional) |
//! | `DATABASE_URL` | `database.url` |
//! | `BIZTIME_HOST` | `server.host` |
//! | `BIZTIME_PORT` | `server.port` |
//! | `BIZTIME_LOG` | `log.filter` |
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 3000
//! database:
//!   url: postgres://localhost/biztime
//!   max_connections: 5
//! log:
//!   filter: biztime=debug,tower_http=info
//! ```

use crate::core::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File read when `BIZTIME_CONFIG` is not set
pub const DEFAULT_CONFIG_FILE: &str = "biztime.yaml";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Database pool settings
///
/// When `url` is absent the binary runs against the in-memory store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            acquire_timeout_secs: 30,
        }
    }
}

/// Tracing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// An `EnvFilter` directive string; `RUST_LOG` wins when set
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "biztime=info,tower_http=info".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from the file named by `BIZTIME_CONFIG` (or the default file if
    /// present), then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("BIZTIME_CONFIG") {
            Ok(path) => Self::from_yaml_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_yaml_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// [`AppConfig::load`])
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(host) = lookup("BIZTIME_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("BIZTIME_PORT") {
            self.server.port = port.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    field: "BIZTIME_PORT".to_string(),
                    value: port.clone(),
                    message: e.to_string(),
                }
            })?;
        }
        if let Some(filter) = lookup("BIZTIME_LOG") {
            self.log.filter = filter;
        }
        Ok(())
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
