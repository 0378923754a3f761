//! Eligible-shard extraction
//!
//! The only place the planner reads the metadata store. Bare shard records
//! are annotated with their temporal and sort ranges, fetched in bounded
//! batches. Delta shards and shards whose required ranges cannot be resolved
//! are dropped; a failing batch aborts the whole extraction.

use std::collections::HashMap;
use std::slice;

use crate::model::{ShardIndexInfo, ShardMetadata, Table, TableColumn};
use crate::observability::{Event, Logger};

use super::errors::{MetadataError, MetadataResult};
use super::row::decode_range;
use super::store::MetadataStore;

/// Maximum shard ids per index query
pub const DEFAULT_INDEX_BATCH_SIZE: usize = 1000;

/// Extraction knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityOptions {
    /// Also resolve ranges over the table's sort columns
    pub include_sort_columns: bool,
    /// Shard ids per index query
    pub batch_size: usize,
}

impl Default for EligibilityOptions {
    fn default() -> Self {
        Self {
            include_sort_columns: false,
            batch_size: DEFAULT_INDEX_BATCH_SIZE,
        }
    }
}

/// Extraction output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleShards {
    /// Range-annotated shards, in input order
    pub shards: Vec<ShardIndexInfo>,
    /// Index queries issued
    pub index_queries: u64,
    /// Delta shards skipped
    pub deltas: u64,
    /// Shards dropped for a missing range or index row
    pub dropped: u64,
}

/// Lists the table's shards and annotates the eligible ones.
pub fn list_eligible_shards<S>(
    store: &S,
    table: &Table,
    options: EligibilityOptions,
) -> MetadataResult<EligibleShards>
where
    S: MetadataStore + ?Sized,
{
    let shards = store.list_shards(table.table_id)?;
    get_organization_eligible_shards(store, table, &shards, options)
}

/// Annotates `shards` of `table` with temporal and sort ranges.
pub fn get_organization_eligible_shards<S>(
    store: &S,
    table: &Table,
    shards: &[ShardMetadata],
    options: EligibilityOptions,
) -> MetadataResult<EligibleShards>
where
    S: MetadataStore + ?Sized,
{
    let table_id = table.table_id;

    let temporal_column = match table.temporal_column_id {
        Some(column_id) => {
            let column = store.get_table_column(table_id, column_id)?;
            if !column.data_type.is_temporal() {
                return Err(MetadataError::UnsupportedTemporalType {
                    table_id,
                    column_id,
                    data_type: column.data_type,
                });
            }
            Some(column)
        }
        None => None,
    };
    let sort_columns: Option<Vec<TableColumn>> = if options.include_sort_columns {
        Some(store.list_sort_columns(table_id)?)
    } else {
        None
    };

    // temporal column first, then sort columns
    let mut requested: Vec<i64> = Vec::new();
    if let Some(column) = &temporal_column {
        requested.push(column.column_id);
    }
    if let Some(columns) = &sort_columns {
        requested.extend(columns.iter().map(|column| column.column_id));
    }
    let sort_offset = usize::from(temporal_column.is_some());

    let candidates: Vec<&ShardMetadata> = shards.iter().filter(|shard| !shard.is_delta).collect();
    let deltas = (shards.len() - candidates.len()) as u64;

    let mut resolved: HashMap<i64, ShardIndexInfo> = HashMap::with_capacity(candidates.len());
    let mut index_queries = 0u64;

    for batch in candidates.chunks(options.batch_size.max(1)) {
        let shard_ids: Vec<i64> = batch.iter().map(|shard| shard.shard_id).collect();
        let by_id: HashMap<i64, &ShardMetadata> =
            batch.iter().map(|shard| (shard.shard_id, *shard)).collect();

        let rows = store.query_shard_index(table_id, &requested, &shard_ids)?;
        index_queries += 1;
        Logger::trace(
            Event::IndexBatchQueried.as_str(),
            &[
                ("table_id", &table_id.to_string()),
                ("requested", &shard_ids.len().to_string()),
                ("returned", &rows.len().to_string()),
            ],
        );

        for row in &rows {
            let Some(shard) = by_id.get(&row.shard_id) else {
                continue;
            };

            let temporal_range = match &temporal_column {
                Some(column) => match decode_range(slice::from_ref(column), row, 0) {
                    Some(range) => Some(range),
                    None => continue,
                },
                None => None,
            };
            let sort_range = match &sort_columns {
                Some(columns) => match decode_range(columns, row, sort_offset) {
                    Some(range) => Some(range),
                    None => continue,
                },
                None => None,
            };

            resolved.insert(
                shard.shard_id,
                ShardIndexInfo::from_metadata(shard, temporal_range, sort_range),
            );
        }
    }

    let mut eligible = Vec::with_capacity(resolved.len());
    for shard in &candidates {
        match resolved.remove(&shard.shard_id) {
            Some(info) => eligible.push(info),
            None => Logger::trace(
                Event::ShardRangeMissing.as_str(),
                &[
                    ("table_id", &table_id.to_string()),
                    ("shard_uuid", &shard.shard_uuid.to_string()),
                ],
            ),
        }
    }
    let dropped = (candidates.len() - eligible.len()) as u64;

    Ok(EligibleShards {
        shards: eligible,
        index_queries,
        deltas,
        dropped,
    })
}
