//! Schema migrations and the spatial-extension install hook

use officeloc_core::error::{OfficelocError, Result};
use sqlx::PgPool;
use thiserror::Error;

/// Extension the schema depends on
pub const SPATIAL_EXTENSION: &str = "postgis";

/// What the operator has to run when the extension is missing
pub const SPATIAL_EXTENSION_REMEDIATION: &str =
    "Ask a database superuser to run `CREATE EXTENSION postgis;` in this database, then retry.";

/// Migration error types
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration failed: {0}")]
    Failed(#[from] sqlx::migrate::MigrateError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Migration status information
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Version number of the migration
    pub version: i64,
    /// Description of the migration
    pub description: String,
    /// Whether the migration has been applied
    pub applied: bool,
}

/// Whether the PostGIS extension is installed in the connected database
pub async fn has_postgis(pool: &PgPool) -> std::result::Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_extension WHERE extname = $1)")
        .bind(SPATIAL_EXTENSION)
        .fetch_one(pool)
        .await
}

/// Whether `office_locations.geometry` exists
pub async fn has_geometry_column(pool: &PgPool) -> std::result::Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.columns
            WHERE table_name = 'office_locations' AND column_name = 'geometry'
        )
        "#,
    )
    .fetch_one(pool)
    .await
}

/// Migration manager for handling database schema migrations
pub struct MigrationManager {
    pool: PgPool,
}

impl MigrationManager {
    /// Create a new migration manager
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fail with remediation text unless the spatial extension is present.
    ///
    /// The extension is never created here; that needs superuser rights the
    /// application should not hold.
    pub async fn ensure_spatial_extension(&self) -> Result<()> {
        let installed = has_postgis(&self.pool).await.map_err(|e| {
            OfficelocError::Storage(format!("Failed to inspect installed extensions: {}", e))
        })?;

        if !installed {
            return Err(OfficelocError::SpatialExtensionMissing {
                extension: SPATIAL_EXTENSION.to_string(),
                remediation: SPATIAL_EXTENSION_REMEDIATION.to_string(),
            });
        }
        Ok(())
    }

    /// Install hook: check the extension, then apply pending migrations
    pub async fn install(&self) -> Result<()> {
        self.ensure_spatial_extension().await?;
        self.run_migrations()
            .await
            .map_err(|e| OfficelocError::Storage(format!("Migration failed: {}", e)))?;
        tracing::info!("Database schema is up to date");
        Ok(())
    }

    /// Run all pending migrations
    pub async fn run_migrations(&self) -> std::result::Result<(), MigrationError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Check migration status
    pub async fn check_status(&self) -> std::result::Result<Vec<MigrationStatus>, MigrationError> {
        let migrator = sqlx::migrate!("./migrations");

        // The tracking table does not exist before the first install
        let applied: Vec<(i64,)> =
            sqlx::query_as("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version")
                .fetch_all(&self.pool)
                .await
                .unwrap_or_default();
        let applied: std::collections::HashSet<i64> = applied.into_iter().map(|(v,)| v).collect();

        Ok(migrator
            .iter()
            .map(|migration| MigrationStatus {
                version: migration.version,
                description: migration.description.to_string(),
                applied: applied.contains(&migration.version),
            })
            .collect())
    }

    /// Check if there are pending migrations
    pub async fn has_pending_migrations(&self) -> std::result::Result<bool, MigrationError> {
        let status = self.check_status().await?;
        Ok(status.iter().any(|s| !s.applied))
    }
}
