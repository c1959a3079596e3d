//! Database configuration loaded from the environment.
//!
//! Every variable is optional; missing ones keep the `DbConfig::new` defaults.
//!
//! | Variable                     | Field             | Default         |
//! |------------------------------|-------------------|-----------------|
//! | `MYSHOP_DB_PATH`             | `database_path`   | `./myshop.db`   |
//! | `MYSHOP_DB_MAX_CONNECTIONS`  | `max_connections` | `5`             |
//! | `MYSHOP_DB_BUSY_TIMEOUT_MS`  | `busy_timeout`    | `5000`          |

use std::env;
use std::time::Duration;

use crate::pool::DbConfig;

pub const ENV_DB_PATH: &str = "MYSHOP_DB_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "MYSHOP_DB_MAX_CONNECTIONS";
pub const ENV_BUSY_TIMEOUT_MS: &str = "MYSHOP_DB_BUSY_TIMEOUT_MS";

const DEFAULT_DB_PATH: &str = "./myshop.db";

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    #[error("{0} must be at least 1")]
    MustBePositive(String),
}

impl DbConfig {
    /// Loads configuration from `MYSHOP_DB_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`DbConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(ENV_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let mut config = DbConfig::new(path);

        if let Some(raw) = lookup(ENV_MAX_CONNECTIONS) {
            let max: u32 = parse_var(ENV_MAX_CONNECTIONS, &raw)?;
            if max == 0 {
                return Err(ConfigError::MustBePositive(ENV_MAX_CONNECTIONS.to_string()));
            }
            let min = config.min_connections.min(max);
            config = config.max_connections(max).min_connections(min);
        }

        if let Some(raw) = lookup(ENV_BUSY_TIMEOUT_MS) {
            let millis: u64 = parse_var(ENV_BUSY_TIMEOUT_MS, &raw)?;
            config = config.busy_timeout(Duration::from_millis(millis));
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: raw.to_string(),
    })
}
