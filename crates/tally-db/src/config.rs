//! Engine configuration.
//!
//! Loaded from environment variables with fallback to defaults.
//!
//! | Variable                    | Default    |
//! |-----------------------------|------------|
//! | `TALLY_DB_PATH`             | `tally.db` |
//! | `TALLY_MAX_CONNECTIONS`     | `5`        |
//! | `TALLY_BUSY_TIMEOUT_MS`     | `5000`     |
//! | `TALLY_LOW_STOCK_THRESHOLD` | `10`       |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tally_core::DEFAULT_LOW_STOCK_THRESHOLD;

use crate::pool::DbConfig;

/// Deployment settings for the transaction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// How long a connection waits on a locked database before failing
    pub busy_timeout_ms: u64,

    /// Dashboard counts products with stock strictly below this
    pub low_stock_threshold: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_path: PathBuf::from("tally.db"),
            max_connections: 5,
            busy_timeout_ms: 5_000,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let settings = Settings {
            database_path: lookup("TALLY_DB_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: parse_var(&lookup, "TALLY_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),

            busy_timeout_ms: parse_var(&lookup, "TALLY_BUSY_TIMEOUT_MS")?
                .unwrap_or(defaults.busy_timeout_ms),

            low_stock_threshold: parse_var(&lookup, "TALLY_LOW_STOCK_THRESHOLD")?
                .unwrap_or(defaults.low_stock_threshold),
        };

        if settings.max_connections == 0 {
            return Err(ConfigError::InvalidValue("TALLY_MAX_CONNECTIONS".to_string()));
        }

        Ok(settings)
    }

    /// Pool configuration for these settings.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_millis(self.busy_timeout_ms))
            .low_stock_threshold(self.low_stock_threshold)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.database_path, PathBuf::from("tally.db"));
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.busy_timeout_ms, 5_000);
        assert_eq!(settings.low_stock_threshold, 10);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("TALLY_DB_PATH", "/var/lib/tally/store.db"),
            ("TALLY_MAX_CONNECTIONS", "8"),
            ("TALLY_LOW_STOCK_THRESHOLD", " 3 "),
        ]))
        .unwrap();
        assert_eq!(settings.database_path, PathBuf::from("/var/lib/tally/store.db"));
        assert_eq!(settings.max_connections, 8);
        assert_eq!(settings.low_stock_threshold, 3);

        let config = settings.db_config();
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.low_stock_threshold, 3);
        assert_eq!(config.busy_timeout, Duration::from_millis(5_000));
    }

    #[test]
    fn test_invalid_values() {
        let err = Settings::from_lookup(lookup(&[("TALLY_BUSY_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "TALLY_BUSY_TIMEOUT_MS"));

        assert!(Settings::from_lookup(lookup(&[("TALLY_MAX_CONNECTIONS", "0")])).is_err());
    }
}
