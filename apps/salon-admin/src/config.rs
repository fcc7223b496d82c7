//! salon-admin configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// salon-admin configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// SQLite database file (`SALON_DATABASE_PATH`, default `salon.db`)
    pub database_path: PathBuf,

    /// Pool size (`SALON_DB_MAX_CONNECTIONS`, default 5)
    pub max_connections: u32,

    /// tracing filter directive (`SALON_LOG`, default `info`)
    pub log_filter: String,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = AdminConfig {
            database_path: lookup("SALON_DATABASE_PATH")
                .unwrap_or_else(|| "salon.db".to_string())
                .into(),

            max_connections: lookup("SALON_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SALON_DB_MAX_CONNECTIONS".to_string()))?,

            log_filter: lookup("SALON_LOG").unwrap_or_else(|| "info".to_string()),
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "SALON_DB_MAX_CONNECTIONS".to_string(),
            ));
        }
        if config.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("SALON_DATABASE_PATH".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AdminConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("salon.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_overrides() {
        let config = AdminConfig::from_lookup(lookup(&[
            ("SALON_DATABASE_PATH", "/var/lib/salon/salon.db"),
            ("SALON_DB_MAX_CONNECTIONS", "2"),
            ("SALON_LOG", "debug,sqlx=warn"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/salon/salon.db"));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.log_filter, "debug,sqlx=warn");
    }

    #[test]
    fn test_invalid_pool_size() {
        for bad in ["many", "0", "-1"] {
            let err = AdminConfig::from_lookup(lookup(&[("SALON_DB_MAX_CONNECTIONS", bad)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "SALON_DB_MAX_CONNECTIONS"));
        }
    }

    #[test]
    fn test_empty_path_rejected() {
        let err = AdminConfig::from_lookup(lookup(&[("SALON_DATABASE_PATH", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
    }
}
