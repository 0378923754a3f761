//! CLI command implementations
//!
//! plan:
//! 1. Configuration load and validation
//! 2. Log level applied
//! 3. Catalog load into an in-memory store
//! 4. One planning pass (one table or all tables)
//! 5. One JSON line per organization set on stdout
//!
//! tables:
//! 1. Catalog load
//! 2. One JSON line per table on stdout

use std::io::{self, Write};
use std::path::Path;

use serde_json::json;

use crate::config::PlannerConfig;
use crate::metadata::{InMemoryMetadataStore, MetadataStore};
use crate::observability::{log_event, Event, Logger};
use crate::organization::CompactionPlanner;

use super::args::Command;
use super::errors::CliResult;
use super::io::{read_catalog, write_json};

/// Run a parsed command against stdout
pub fn run_command(command: Command) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Plan {
            config,
            catalog,
            table,
        } => plan(&config, &catalog, table, &mut out),
        Command::Tables { catalog } => tables(&catalog, &mut out),
    }?;
    out.flush()?;
    Ok(())
}

fn load_store(catalog_path: &Path) -> CliResult<InMemoryMetadataStore> {
    let catalog = read_catalog(catalog_path)?;
    let counts = (
        catalog.tables.len().to_string(),
        catalog.shards.len().to_string(),
    );
    let store = InMemoryMetadataStore::from_catalog(catalog)?;
    log_event(
        Event::CatalogLoaded,
        &[
            ("path", &catalog_path.display().to_string()),
            ("tables", &counts.0),
            ("shards", &counts.1),
        ],
    );
    Ok(store)
}

/// Plan organization sets and write them as JSON lines
pub fn plan<W: Write>(
    config_path: &Path,
    catalog_path: &Path,
    table: Option<i64>,
    out: &mut W,
) -> CliResult<()> {
    let config = PlannerConfig::load(config_path)?;
    Logger::set_min_severity(config.severity()?);
    log_event(
        Event::ConfigLoaded,
        &[
            ("path", &config_path.display().to_string()),
            ("max_shard_size_bytes", &config.max_shard_size_bytes.to_string()),
            ("max_shard_rows", &config.max_shard_rows.to_string()),
            ("time_zone", &config.time_zone),
        ],
    );

    let store = load_store(catalog_path)?;
    let planner = CompactionPlanner::new(&store, config.creator()?, config.eligibility());

    let sets = match table {
        Some(table_id) => planner.plan_table(table_id)?,
        None => planner.plan_all()?,
    };
    for set in &sets {
        write_json(out, set)?;
    }

    Logger::info(
        Event::MetricsReported.as_str(),
        &[("metrics", &planner.metrics().to_json())],
    );
    Ok(())
}

/// List catalog tables and their partitioning
pub fn tables<W: Write>(catalog_path: &Path, out: &mut W) -> CliResult<()> {
    let store = load_store(catalog_path)?;
    for table in store.list_tables()? {
        let shards = store.list_shards(table.table_id)?;
        let deltas = shards.iter().filter(|shard| shard.is_delta).count();
        write_json(
            out,
            &json!({
                "table_id": table.table_id,
                "partitioning": table.partitioning(),
                "bucket_count": table.bucket_count,
                "temporal_column_id": table.temporal_column_id,
                "shards": shards.len() - deltas,
                "delta_shards": deltas,
            }),
        )?;
    }
    Ok(())
}
