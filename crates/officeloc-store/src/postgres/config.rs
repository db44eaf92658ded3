//! PostgreSQL configuration

use std::time::Duration;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Connection pool configuration
    pub pool: PoolConfig,
}

impl PostgresConfig {
    /// Load configuration from the `DATABASE_URL` environment variable
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?;

        Self::new(database_url).map_err(|_| ConfigError::Invalid {
            key: "DATABASE_URL".to_string(),
            reason: "cannot be empty".to_string(),
        })
    }

    /// Create a new configuration with the given database URL
    pub fn new(database_url: String) -> Result<Self, ConfigError> {
        let config = Self { database_url, pool: PoolConfig::default() };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "database_url".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(ConfigError::Invalid {
                key: "database_url".to_string(),
                reason: "must start with postgres:// or postgresql://".to_string(),
            });
        }

        self.pool.validate()
    }
}

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Maximum number of connections allowed
    pub max_connections: u32,
    /// Timeout for acquiring a connection from the pool
    pub acquire_timeout: Duration,
    /// Timeout for idle connections before they are closed
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

impl PoolConfig {
    /// Validate pool configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "pool.max_connections".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid {
                key: "pool.min_connections".to_string(),
                reason: format!(
                    "min_connections ({}) cannot be greater than max_connections ({})",
                    self.min_connections, self.max_connections
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_valid() {
        let config = PostgresConfig::new("postgresql://localhost/officeloc".to_string());
        assert!(config.is_ok());
    }

    #[test]
    fn test_config_new_empty_url() {
        match PostgresConfig::new("  ".to_string()) {
            Err(ConfigError::Invalid { key, .. }) => assert_eq!(key, "database_url"),
            other => panic!("Expected Invalid error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_rejects_other_schemes() {
        assert!(PostgresConfig::new("mysql://localhost/officeloc".to_string()).is_err());
    }

    #[test]
    fn test_pool_config_default() {
        let pool = PoolConfig::default();
        assert_eq!(pool.max_connections, 10);
        assert!(pool.validate().is_ok());
    }

    #[test]
    fn test_pool_config_invalid_min_max() {
        let pool = PoolConfig { min_connections: 20, max_connections: 10, ..Default::default() };
        assert!(pool.validate().is_err());

        let pool = PoolConfig { min_connections: 0, max_connections: 0, ..Default::default() };
        assert!(pool.validate().is_err());
    }
}
