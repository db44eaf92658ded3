use crate::cli::{DbArgs, DbCommand};
use crate::output::OutputWriter;
use crate::output_types::DbCheckOutput;
use crate::storage::connect_postgres;
use anyhow::{Context, Result};
use officeloc_core::config::LayeredConfig;
use officeloc_store::postgres::migrations::SPATIAL_EXTENSION_REMEDIATION;
use officeloc_store::postgres::PostgresStore;

/// Execute database management commands
pub async fn execute(args: DbArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let store = connect_postgres(config).await?;

    match args.command {
        DbCommand::Check => execute_check(&store, output).await,
        DbCommand::Install => execute_install(&store, output).await,
    }
}

async fn execute_check(store: &PostgresStore, output: &OutputWriter) -> Result<()> {
    store.health_check().await.context("Database health check failed")?;
    let spatial = store.spatial_status().await?;
    let pending: Vec<String> = store
        .migration_status()
        .await?
        .into_iter()
        .filter(|m| !m.applied)
        .map(|m| format!("{} {}", m.version, m.description))
        .collect();

    if output.is_json() {
        return output.result(DbCheckOutput {
            connected: true,
            postgis: spatial.postgis,
            geometry_column: spatial.geometry_column,
            pending_migrations: pending,
        });
    }

    output.success("Connected to PostgreSQL");
    if spatial.postgis {
        output.success("PostGIS extension installed");
    } else {
        output.warning(format!("PostGIS extension missing. {}", SPATIAL_EXTENSION_REMEDIATION));
    }
    if spatial.geometry_column {
        output.success("office_locations.geometry present");
    } else {
        output.warning("office_locations.geometry missing. Run `officeloc db install`");
    }
    if pending.is_empty() {
        output.success("Migrations up to date");
    } else {
        output.warning(format!("{} pending migration(s):", pending.len()));
        for migration in &pending {
            output.info(format!("  - {}", migration));
        }
    }
    Ok(())
}

async fn execute_install(store: &PostgresStore, output: &OutputWriter) -> Result<()> {
    output.info("Checking PostGIS and applying migrations...");
    store.install().await.context("Installation failed")?;
    output.success("Database installed");
    Ok(())
}
