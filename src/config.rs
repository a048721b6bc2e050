//! Process configuration for the registrar service.
//!
//! Settings come from environment variables. The binary loads an optional
//! `.env` file with `dotenvy` before reading them.
//!
//! | Variable                        | Default     |
//! |---------------------------------|-------------|
//! | `DATABASE_URL`                  | required    |
//! | `DATABASE_MAX_CONNECTIONS`      | `10`        |
//! | `DATABASE_CONNECT_TIMEOUT_SECS` | `5`         |
//! | `REGISTRAR_HOST`                | `127.0.0.1` |
//! | `REGISTRAR_PORT`                | `3000`      |

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::database::DatabaseConfig;

/// Default listener host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listener port.
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable holds a value that cannot be used.
    #[error("{name} has invalid value '{value}': {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// What was expected.
        reason: &'static str,
    },
}

/// Settings for one registrar process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Database pool settings.
    pub database: DatabaseConfig,
    /// Listener host or IP.
    pub host: String,
    /// Listener port. `0` picks a free port.
    pub port: u16,
}

impl ServiceConfig {
    /// Creates settings for `database_url` with default pool and listener
    /// values.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database: DatabaseConfig::new(database_url),
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
        }
    }

    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// See [`ServiceConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `DATABASE_URL` is absent and
    /// [`ConfigError::Invalid`] when a numeric setting does not parse or the
    /// pool size is zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let mut config = Self::new(url);

        if let Some(max) = parse_var::<u32, _>(&lookup, "DATABASE_MAX_CONNECTIONS")? {
            if max == 0 {
                return Err(ConfigError::Invalid {
                    name: "DATABASE_MAX_CONNECTIONS",
                    value: max.to_string(),
                    reason: "expected at least one connection",
                });
            }
            config.database = config.database.with_max_connections(max);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "DATABASE_CONNECT_TIMEOUT_SECS")? {
            config.database = config
                .database
                .with_connect_timeout(Duration::from_secs(secs));
        }
        if let Some(host) = lookup("REGISTRAR_HOST").filter(|value| !value.trim().is_empty()) {
            config.host = host.trim().to_owned();
        }
        if let Some(port) = parse_var::<u16, _>(&lookup, "REGISTRAR_PORT")? {
            config.port = port;
        }

        Ok(config)
    }

    /// Returns the `host:port` listener address.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: "expected a non-negative integer",
        })
}
