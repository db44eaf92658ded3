use clap::{Parser, Subcommand};
use officeloc_core::models::Srid;
use std::path::PathBuf;

/// officeloc - Office geofences for attendance check-in
#[derive(Parser, Debug)]
#[command(name = "officeloc")]
#[command(about = "Resolve coordinates to office polygons", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Storage backend to use (memory or postgres)
    #[arg(long, global = true, default_value = "memory")]
    pub storage: StorageBackend,

    /// Directory the memory backend saves offices to
    #[arg(long, global = true, default_value = ".officeloc")]
    pub data_dir: PathBuf,

    /// Reference system for polygon text without --srid (4326 or 3857)
    #[arg(long, global = true)]
    pub default_srid: Option<Srid>,

    /// PostgreSQL database URL (overrides DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StorageBackend {
    /// In-memory storage saved to the data directory (default)
    Memory,
    /// PostgreSQL/PostGIS persistent storage
    Postgres,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage offices and their polygons
    Office(OfficeArgs),

    /// Resolve a coordinate to an office name
    Resolve(ResolveArgs),

    /// Great-circle distance between two coordinates
    Distance(DistanceArgs),

    /// Manage the PostgreSQL database
    Db(DbArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct OfficeArgs {
    #[command(subcommand)]
    pub command: OfficeCommand,
}

#[derive(Subcommand, Debug)]
pub enum OfficeCommand {
    /// Register a new office
    Add(AddOfficeArgs),

    /// List all offices
    List,

    /// Show one office and its polygon
    Show(OfficeIdArgs),

    /// Replace an office polygon; empty text removes it
    SetGeometry(SetGeometryArgs),

    /// Rename an office
    Rename(RenameArgs),

    /// Delete an office
    Remove(OfficeIdArgs),
}

#[derive(Parser, Debug)]
pub struct AddOfficeArgs {
    /// Office name
    pub name: String,

    /// Polygon as WKT, e.g. "POLYGON((lon lat, ...))"
    #[arg(long)]
    pub wkt: Option<String>,

    /// Reference system of the polygon text
    #[arg(long)]
    pub srid: Option<Srid>,
}

#[derive(Parser, Debug)]
pub struct OfficeIdArgs {
    pub id: u64,
}

#[derive(Parser, Debug)]
pub struct SetGeometryArgs {
    pub id: u64,

    /// Polygon as WKT
    pub wkt: String,

    /// Reference system of the polygon text
    #[arg(long)]
    pub srid: Option<Srid>,
}

#[derive(Parser, Debug)]
pub struct RenameArgs {
    pub id: u64,
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Latitude in degrees; anything non-numeric is read as 0
    #[arg(allow_hyphen_values = true)]
    pub latitude: String,

    /// Longitude in degrees; anything non-numeric is read as 0
    #[arg(allow_hyphen_values = true)]
    pub longitude: String,
}

#[derive(Parser, Debug)]
pub struct DistanceArgs {
    #[arg(allow_negative_numbers = true)]
    pub lat1: f64,
    #[arg(allow_negative_numbers = true)]
    pub lon1: f64,
    #[arg(allow_negative_numbers = true)]
    pub lat2: f64,
    #[arg(allow_negative_numbers = true)]
    pub lon2: f64,
}

#[derive(Parser, Debug)]
pub struct DbArgs {
    /// Database management command
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Check the connection, PostGIS and migrations
    Check,

    /// Verify PostGIS is present and apply migrations
    Install,
}
