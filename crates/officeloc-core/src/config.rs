use crate::error::{OfficelocError, Result};
use crate::models::Srid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default configuration file name looked up by the CLI
pub const CONFIG_FILE_NAME: &str = "officeloc.toml";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for officeloc
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Reference system assumed for polygon text when none is given
    pub default_srid: ConfigValue<Srid>,
    /// PostgreSQL connection URL; in-memory storage when unset
    pub database_url: ConfigValue<Option<String>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            default_srid: ConfigValue::new(Srid::Wgs84, ConfigSource::Default),
            database_url: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| OfficelocError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| OfficelocError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(srid) = file_config.default_srid {
            self.default_srid.update(Srid::from_epsg(srid)?, ConfigSource::File);
        }

        if let Some(url) = file_config.database_url {
            self.database_url.update(Some(url), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load the file only if it exists
    pub fn load_from_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.load_from_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // OFFICELOC_DEFAULT_SRID
        if let Ok(srid_str) = env::var("OFFICELOC_DEFAULT_SRID") {
            match srid_str.parse::<Srid>() {
                Ok(srid) => self.default_srid.update(srid, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid OFFICELOC_DEFAULT_SRID value '{}': expected 4326 or 3857",
                    srid_str
                ),
            }
        }

        // DATABASE_URL
        if let Ok(url) = env::var("DATABASE_URL") {
            if url.trim().is_empty() {
                tracing::warn!("Ignoring empty DATABASE_URL");
            } else {
                self.database_url.update(Some(url), ConfigSource::Environment);
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(srid) = overrides.default_srid {
            self.default_srid.update(srid, ConfigSource::Cli);
        }

        if let Some(url) = overrides.database_url {
            self.database_url.update(Some(url), ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "default_srid".to_string(),
            (self.default_srid.value.to_string(), self.default_srid.source),
        );

        // Never echo credentials
        let url_display = match &self.database_url.value {
            Some(url) => format!("...@{}", url.split('@').next_back().unwrap_or(url)),
            None => "(memory)".to_string(),
        };
        map.insert("database_url".to_string(), (url_display, self.database_url.source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    default_srid: Option<u32>,
    database_url: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub default_srid: Option<Srid>,
    pub database_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.default_srid.value, Srid::Wgs84);
        assert_eq!(config.default_srid.source, ConfigSource::Default);
        assert!(config.database_url.value.is_none());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);

        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);

        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
default_srid = 3857
database_url = "postgresql://localhost/officeloc"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.default_srid.value, Srid::WebMercator);
        assert_eq!(config.default_srid.source, ConfigSource::File);
        assert_eq!(
            config.database_url.value.as_deref(),
            Some("postgresql://localhost/officeloc")
        );
    }

    #[test]
    fn test_load_from_file_rejects_unknown_srid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_srid = 32748").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(OfficelocError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_missing_optional_file_keeps_defaults() {
        let config = LayeredConfig::with_defaults()
            .load_from_optional_file("/nonexistent/officeloc.toml")
            .unwrap();
        assert_eq!(config.default_srid.source, ConfigSource::Default);
    }

    #[test]
    #[serial]
    fn test_load_from_env() {
        env::set_var("OFFICELOC_DEFAULT_SRID", "EPSG:3857");
        env::set_var("DATABASE_URL", "postgresql://user:secret@db:5432/officeloc");

        let config = LayeredConfig::with_defaults().load_from_env();

        env::remove_var("OFFICELOC_DEFAULT_SRID");
        env::remove_var("DATABASE_URL");

        assert_eq!(config.default_srid.value, Srid::WebMercator);
        assert_eq!(config.default_srid.source, ConfigSource::Environment);
        assert_eq!(config.database_url.source, ConfigSource::Environment);

        let map = config.to_inspection_map();
        let (url, _) = &map["database_url"];
        assert!(!url.contains("secret"));
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_is_ignored() {
        env::set_var("OFFICELOC_DEFAULT_SRID", "not-a-code");

        let config = LayeredConfig::with_defaults().load_from_env();

        env::remove_var("OFFICELOC_DEFAULT_SRID");

        assert_eq!(config.default_srid.value, Srid::Wgs84);
        assert_eq!(config.default_srid.source, ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            default_srid: Some(Srid::WebMercator),
            database_url: None,
        });

        assert_eq!(config.default_srid.value, Srid::WebMercator);
        assert_eq!(config.default_srid.source, ConfigSource::Cli);
        assert_eq!(config.database_url.source, ConfigSource::Default);
    }
}
