//! PostgreSQL/PostGIS storage adapter

pub mod attendance;
pub mod config;
pub mod migrations;
pub mod office;

pub use config::{ConfigError, PoolConfig, PostgresConfig};
pub use migrations::{MigrationError, MigrationManager, MigrationStatus};

use officeloc_core::error::{OfficelocError, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

use migrations::{has_geometry_column, has_postgis};

/// PostgreSQL storage adapter
pub struct PostgresStore {
    pool: PgPool,
    config: PostgresConfig,
}

/// Report of the spatial prerequisites, as shown by `officeloc db check`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialStatus {
    pub postgis: bool,
    pub geometry_column: bool,
}

impl SpatialStatus {
    pub fn is_ready(&self) -> bool {
        self.postgis && self.geometry_column
    }
}

impl PostgresStore {
    /// Connect using the given configuration
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        config.validate().map_err(|e| OfficelocError::ConfigInvalid {
            key: "database_url".to_string(),
            reason: e.to_string(),
        })?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .connect(&config.database_url)
            .await
            .map_err(|e| OfficelocError::Storage(format!("Failed to connect to database: {}", e)))?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| OfficelocError::Storage(format!("Connection test failed: {}", e)))?;

        Ok(Self { pool, config })
    }

    /// Connect and run the install hook
    pub async fn with_install(config: PostgresConfig) -> Result<Self> {
        let store = Self::new(config).await?;
        store.install().await?;
        Ok(store)
    }

    /// Check the spatial extension and apply pending migrations
    pub async fn install(&self) -> Result<()> {
        MigrationManager::new(self.pool.clone()).install().await
    }

    /// Check migration status
    pub async fn migration_status(&self) -> Result<Vec<MigrationStatus>> {
        MigrationManager::new(self.pool.clone()).check_status().await.map_err(|e| {
            OfficelocError::Storage(format!("Failed to check migration status: {}", e))
        })
    }

    /// Which spatial prerequisites are present
    pub async fn spatial_status(&self) -> Result<SpatialStatus> {
        let check = |e: sqlx::Error| OfficelocError::SpatialEngineUnavailable {
            reason: format!("Failed to inspect the database: {}", e),
        };

        Ok(SpatialStatus {
            postgis: has_postgis(&self.pool).await.map_err(check)?,
            geometry_column: has_geometry_column(&self.pool).await.map_err(check)?,
        })
    }

    /// Fail with [`OfficelocError::SpatialEngineUnavailable`] unless geometry
    /// operations can run
    pub async fn ensure_spatial_engine(&self) -> Result<()> {
        let status = self.spatial_status().await?;

        if !status.postgis {
            return Err(OfficelocError::SpatialEngineUnavailable {
                reason: "PostGIS extension is not installed".to_string(),
            });
        }
        if !status.geometry_column {
            return Err(OfficelocError::SpatialEngineUnavailable {
                reason: "office_locations.geometry is missing; run `officeloc db install`"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &PostgresConfig {
        &self.config
    }

    /// Perform a health check on the database connection
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| OfficelocError::Storage(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}

/// Map a query failure into a storage error with context
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> OfficelocError {
    move |e| OfficelocError::Storage(format!("{}: {}", context, e))
}

/// An unsigned key as a `BIGINT` parameter
pub(crate) fn bigint(value: u64, column: &str) -> Result<i64> {
    i64::try_from(value).map_err(|_| {
        OfficelocError::Storage(format!("{} {} is out of BIGINT range", column, value))
    })
}

/// A `BIGINT` column read back as an unsigned key
pub(crate) fn unsigned(value: i64, column: &str) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| OfficelocError::Storage(format!("{} {} is negative", column, value)))
}
