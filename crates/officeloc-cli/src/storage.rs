use crate::cli::StorageBackend;
use anyhow::{Context, Result};
use officeloc_core::config::LayeredConfig;
use officeloc_core::models::{OfficeId, Srid};
use officeloc_resolver::{GeometryOutcome, GeometryStore, LocationResolver};
use officeloc_store::postgres::{PostgresConfig, PostgresStore};
use officeloc_store::MemoryStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const OFFICES_FILE: &str = "offices.json";

/// Contents of `offices.json`
#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedOffices {
    /// Highest id ever handed out, so deleted ids stay retired across reloads
    #[serde(default)]
    last_office_id: u64,
    offices: Vec<SavedOffice>,
}

/// An office as saved by the memory backend. The polygon is re-normalized
/// from its raw text on load.
#[derive(Debug, Serialize, Deserialize)]
struct SavedOffice {
    id: OfficeId,
    name: String,
    raw_wkt: Option<String>,
    srid: Srid,
}

pub struct Storage {
    pub geometry: GeometryStore,
    pub resolver: LocationResolver,
    /// The memory backend and where it saves offices; `None` for PostgreSQL
    memory: Option<(Arc<MemoryStore>, PathBuf)>,
}

impl Storage {
    pub async fn new(backend: StorageBackend, config: &LayeredConfig, data_dir: &Path) -> Result<Self> {
        let storage = match backend {
            StorageBackend::Memory => Self::new_memory(data_dir).await?,
            StorageBackend::Postgres => {
                let store = Arc::new(connect_postgres(config).await?);
                Self {
                    geometry: GeometryStore::new(store.clone()),
                    resolver: LocationResolver::new(store),
                    memory: None,
                }
            }
        };

        Ok(Self {
            geometry: storage.geometry.with_default_srid(config.default_srid.value),
            ..storage
        })
    }

    /// Memory store seeded from the data directory
    async fn new_memory(data_dir: &Path) -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let geometry = GeometryStore::new(store.clone());
        let offices_file = data_dir.join(OFFICES_FILE);

        if offices_file.exists() {
            let content = fs::read_to_string(&offices_file)
                .with_context(|| format!("Failed to read {}", offices_file.display()))?;
            let saved: SavedOffices = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", offices_file.display()))?;

            store.retire_office_ids(saved.last_office_id)?;
            for office in saved.offices {
                store.restore_office(office.id, &office.name)?;
                if let Some(wkt) = &office.raw_wkt {
                    let outcome = geometry.set_geometry(office.id, wkt, office.srid).await?;
                    if let GeometryOutcome::Skipped { reason } = outcome {
                        tracing::warn!(office_id = %office.id, reason = %reason, "Saved polygon could not be restored");
                    }
                }
            }
        }

        Ok(Self {
            geometry,
            resolver: LocationResolver::new(store.clone()),
            memory: Some((store, offices_file)),
        })
    }

    /// Write offices back to the data directory (memory backend only)
    pub async fn save(&self) -> Result<()> {
        let Some((store, path)) = &self.memory else {
            return Ok(());
        };

        let offices = self
            .geometry
            .list_offices()
            .await?
            .into_iter()
            .map(|office| SavedOffice {
                id: office.id,
                name: office.name,
                raw_wkt: office.raw_wkt,
                srid: office.source_srid,
            })
            .collect();
        let saved = SavedOffices { last_office_id: store.last_office_id()?, offices };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        fs::write(path, serde_json::to_string_pretty(&saved)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Connect to PostgreSQL using the configured database URL
pub async fn connect_postgres(config: &LayeredConfig) -> Result<PostgresStore> {
    let database_url = config.database_url.value.clone().context(
        "No database configured. Set DATABASE_URL or pass --database-url.",
    )?;

    let pg_config = PostgresConfig::new(database_url).context("Invalid database URL")?;
    let (host, database) = describe_database_url(&pg_config.database_url);

    PostgresStore::new(pg_config).await.with_context(|| {
        format!(
            "Failed to connect to PostgreSQL\n\n\
                Connection details:\n\
                  Host: {}\n\
                  Database: {}\n\n\
                Remediation:\n\
                  1. Ensure PostgreSQL is running\n\
                  2. Check DATABASE_URL or --database-url\n\
                  3. Verify credentials and that the database exists",
            host, database
        )
    })
}

/// Host and database name of a connection URL, without credentials
fn describe_database_url(url: &str) -> (String, String) {
    let after_credentials = url.rsplit('@').next().unwrap_or(url);
    let after_scheme = after_credentials.split("://").last().unwrap_or(after_credentials);

    let host = after_scheme.split('/').next().unwrap_or("localhost").to_string();
    let database = after_scheme
        .split('/')
        .nth(1)
        .and_then(|s| s.split('?').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("officeloc")
        .to_string();

    (host, database)
}
