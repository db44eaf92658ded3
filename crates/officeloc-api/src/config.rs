use std::env;

use officeloc_core::config::LayeredConfig;
use officeloc_core::models::Srid;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// PostgreSQL when set, in-memory storage otherwise
    pub database_url: Option<String>,
    pub default_srid: Srid,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("OFFICELOC_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3001);

        let cors_origin = env::var("OFFICELOC_CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let layered = LayeredConfig::with_defaults().load_from_env();

        Self {
            port,
            cors_origin,
            database_url: layered.database_url.value,
            default_srid: layered.default_srid.value,
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Check if PostgreSQL storage is configured
    pub fn uses_postgres(&self) -> bool {
        self.database_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] =
        ["OFFICELOC_PORT", "OFFICELOC_CORS_ORIGIN", "OFFICELOC_DEFAULT_SRID", "DATABASE_URL"];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ApiConfig::from_env();

        assert_eq!(config.port, 3001);
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.default_srid, Srid::Wgs84);
        assert!(!config.uses_postgres());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        env::set_var("OFFICELOC_PORT", "8080");
        env::set_var("OFFICELOC_DEFAULT_SRID", "3857");
        env::set_var("DATABASE_URL", "postgresql://localhost/officeloc");

        let config = ApiConfig::from_env();
        clear_env();

        assert_eq!(config.port, 8080);
        assert_eq!(config.default_srid, Srid::WebMercator);
        assert!(config.uses_postgres());
    }

    #[test]
    #[serial]
    fn test_bad_port_falls_back() {
        clear_env();
        env::set_var("OFFICELOC_PORT", "http");
        let config = ApiConfig::from_env();
        clear_env();

        assert_eq!(config.port, 3001);
    }
}
