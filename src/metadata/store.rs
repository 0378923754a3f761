//! # Metadata Store
//!
//! Read-only access to table, column and shard metadata.
//! `InMemoryMetadataStore` backs tests and the CLI; production stores are
//! database-backed and implement the same trait.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::model::{ShardMetadata, Table, TableColumn, Value};

use super::errors::{MetadataError, MetadataResult};
use super::row::IndexRow;

/// Trait for metadata store reads used by the planner
pub trait MetadataStore: Send + Sync {
    /// Get a table descriptor
    fn get_table(&self, table_id: i64) -> MetadataResult<Table>;

    /// List all tables in ascending table id
    fn list_tables(&self) -> MetadataResult<Vec<Table>>;

    /// Get one column of a table
    fn get_table_column(&self, table_id: i64, column_id: i64) -> MetadataResult<TableColumn>;

    /// List the table's sort columns in sort-key order
    fn list_sort_columns(&self, table_id: i64) -> MetadataResult<Vec<TableColumn>>;

    /// List live shards of a table in ascending shard id, delta shards included
    fn list_shards(&self, table_id: i64) -> MetadataResult<Vec<ShardMetadata>>;

    /// Fetch min/max statistics of `columns` for `shard_ids`.
    ///
    /// Issued once per batch; returns at most one row per requested shard,
    /// with values positionally matching `columns`.
    fn query_shard_index(
        &self,
        table_id: i64,
        columns: &[i64],
        shard_ids: &[i64],
    ) -> MetadataResult<Vec<IndexRow>>;
}

/// Min/max statistics of one column in one shard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub table_id: i64,
    pub shard_id: i64,
    pub column_id: i64,
    #[serde(default)]
    pub min: Option<Value>,
    #[serde(default)]
    pub max: Option<Value>,
}

/// Serializable contents of an in-memory store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub columns: Vec<TableColumn>,
    #[serde(default)]
    pub shards: Vec<ShardMetadata>,
    #[serde(default)]
    pub stats: Vec<ColumnStats>,
}

#[derive(Debug, Default)]
struct CatalogState {
    tables: BTreeMap<i64, Table>,
    columns: BTreeMap<(i64, i64), TableColumn>,
    shards: BTreeMap<i64, ShardMetadata>,
    stats: HashMap<(i64, i64, i64), (Option<Value>, Option<Value>)>,
}

/// In-memory metadata store
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    state: RwLock<CatalogState>,
    index_queries: AtomicU64,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store holding everything in `catalog`
    pub fn from_catalog(catalog: Catalog) -> MetadataResult<Self> {
        let store = Self::new();
        for table in catalog.tables {
            store.insert_table(table)?;
        }
        for column in catalog.columns {
            store.insert_column(column)?;
        }
        for shard in catalog.shards {
            store.insert_shard(shard)?;
        }
        for stats in catalog.stats {
            store.set_column_stats(
                stats.table_id,
                stats.shard_id,
                stats.column_id,
                stats.min,
                stats.max,
            )?;
        }
        Ok(store)
    }

    pub fn insert_table(&self, table: Table) -> MetadataResult<()> {
        self.write()?.tables.insert(table.table_id, table);
        Ok(())
    }

    pub fn insert_column(&self, column: TableColumn) -> MetadataResult<()> {
        self.write()?
            .columns
            .insert((column.table_id, column.column_id), column);
        Ok(())
    }

    /// Adds a shard, replacing any shard with the same numeric id
    pub fn insert_shard(&self, shard: ShardMetadata) -> MetadataResult<()> {
        self.write()?.shards.insert(shard.shard_id, shard);
        Ok(())
    }

    pub fn set_column_stats(
        &self,
        table_id: i64,
        shard_id: i64,
        column_id: i64,
        min: Option<Value>,
        max: Option<Value>,
    ) -> MetadataResult<()> {
        self.write()?
            .stats
            .insert((table_id, shard_id, column_id), (min, max));
        Ok(())
    }

    /// Number of index queries served so far
    pub fn index_query_count(&self) -> u64 {
        self.index_queries.load(Ordering::Relaxed)
    }

    fn read(&self) -> MetadataResult<RwLockReadGuard<'_, CatalogState>> {
        self.state
            .read()
            .map_err(|_| MetadataError::Internal("Lock poisoned".to_string()))
    }

    fn write(&self) -> MetadataResult<RwLockWriteGuard<'_, CatalogState>> {
        self.state
            .write()
            .map_err(|_| MetadataError::Internal("Lock poisoned".to_string()))
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn get_table(&self, table_id: i64) -> MetadataResult<Table> {
        self.read()?
            .tables
            .get(&table_id)
            .cloned()
            .ok_or(MetadataError::TableNotFound(table_id))
    }

    fn list_tables(&self) -> MetadataResult<Vec<Table>> {
        Ok(self.read()?.tables.values().cloned().collect())
    }

    fn get_table_column(&self, table_id: i64, column_id: i64) -> MetadataResult<TableColumn> {
        self.read()?
            .columns
            .get(&(table_id, column_id))
            .cloned()
            .ok_or(MetadataError::ColumnNotFound {
                table_id,
                column_id,
            })
    }

    fn list_sort_columns(&self, table_id: i64) -> MetadataResult<Vec<TableColumn>> {
        let state = self.read()?;
        let mut columns: Vec<TableColumn> = state
            .columns
            .values()
            .filter(|column| column.table_id == table_id && column.sort_ordinal_position.is_some())
            .cloned()
            .collect();
        columns.sort_by_key(|column| column.sort_ordinal_position);
        Ok(columns)
    }

    fn list_shards(&self, table_id: i64) -> MetadataResult<Vec<ShardMetadata>> {
        let state = self.read()?;
        if !state.tables.contains_key(&table_id) {
            return Err(MetadataError::TableNotFound(table_id));
        }
        Ok(state
            .shards
            .values()
            .filter(|shard| shard.table_id == table_id)
            .cloned()
            .collect())
    }

    fn query_shard_index(
        &self,
        table_id: i64,
        columns: &[i64],
        shard_ids: &[i64],
    ) -> MetadataResult<Vec<IndexRow>> {
        self.index_queries.fetch_add(1, Ordering::Relaxed);
        let state = self.read()?;

        let rows = shard_ids
            .iter()
            .filter(|shard_id| {
                state
                    .shards
                    .get(*shard_id)
                    .is_some_and(|shard| shard.table_id == table_id)
            })
            .map(|&shard_id| {
                let (mins, maxs): (Vec<_>, Vec<_>) = columns
                    .iter()
                    .map(|&column_id| {
                        state
                            .stats
                            .get(&(table_id, shard_id, column_id))
                            .cloned()
                            .unwrap_or((None, None))
                    })
                    .unzip();
                IndexRow::new(shard_id, mins, maxs)
            })
            .collect();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;
    use uuid::Uuid;

    fn store() -> InMemoryMetadataStore {
        let store = InMemoryMetadataStore::new();
        store.insert_table(Table::new(1).with_temporal_column(10)).unwrap();
        store
            .insert_column(TableColumn::new(1, 10, "ds", ColumnType::Date))
            .unwrap();
        store
            .insert_column(TableColumn::new(1, 11, "b", ColumnType::BigInt).with_sort_position(1))
            .unwrap();
        store
            .insert_column(TableColumn::new(1, 12, "a", ColumnType::Varchar).with_sort_position(0))
            .unwrap();
        store
            .insert_shard(ShardMetadata::new(1, 100, Uuid::new_v4(), 10, 10))
            .unwrap();
        store
            .set_column_stats(1, 100, 10, Some(Value::Integer(5)), Some(Value::Integer(6)))
            .unwrap();
        store
    }

    #[test]
    fn test_get_missing_table() {
        let store = store();
        assert_eq!(store.get_table(9), Err(MetadataError::TableNotFound(9)));
        assert_eq!(store.list_shards(9), Err(MetadataError::TableNotFound(9)));
    }

    #[test]
    fn test_sort_columns_in_key_order() {
        let store = store();
        let names: Vec<String> = store
            .list_sort_columns(1)
            .unwrap()
            .into_iter()
            .map(|c| c.column_name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_index_query_positional_values() {
        let store = store();
        let rows = store.query_shard_index(1, &[10, 11], &[100, 999]).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].shard_id, 100);
        assert_eq!(rows[0].mins, vec![Some(Value::Integer(5)), None]);
        assert_eq!(rows[0].maxs, vec![Some(Value::Integer(6)), None]);
        assert_eq!(store.index_query_count(), 1);
    }

    #[test]
    fn test_insert_shard_replaces_same_id() {
        let store = store();
        store
            .insert_shard(ShardMetadata::new(1, 100, Uuid::new_v4(), 99, 99))
            .unwrap();
        let shards = store.list_shards(1).unwrap();
        assert_eq!(shards.len(), 1);
        assert_eq!(shards[0].row_count, 99);
    }

    #[test]
    fn test_shards_listed_by_id() {
        let store = store();
        for shard_id in [7, 3, 200] {
            store
                .insert_shard(ShardMetadata::new(1, shard_id, Uuid::new_v4(), 1, 1))
                .unwrap();
        }
        store
            .insert_shard(ShardMetadata::new(2, 5, Uuid::new_v4(), 1, 1))
            .unwrap();

        let ids: Vec<i64> = store
            .list_shards(1)
            .unwrap()
            .iter()
            .map(|shard| shard.shard_id)
            .collect();
        assert_eq!(ids, vec![3, 7, 100, 200]);
    }

    #[test]
    fn test_index_query_ignores_other_tables() {
        let store = store();
        store.insert_table(Table::new(2)).unwrap();
        store
            .insert_shard(ShardMetadata::new(2, 5, Uuid::new_v4(), 1, 1))
            .unwrap();

        assert!(store.query_shard_index(1, &[10], &[5]).unwrap().is_empty());
        assert_eq!(store.query_shard_index(2, &[10], &[5]).unwrap().len(), 1);
    }

    #[test]
    fn test_catalog_json_roundtrip_into_store() {
        let json = r#"{
            "tables": [{"table_id": 2, "bucket_count": 4}],
            "shards": [{
                "table_id": 2,
                "shard_id": 1,
                "shard_uuid": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "bucket_number": 3,
                "row_count": 5,
                "uncompressed_size": 50
            }]
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let store = InMemoryMetadataStore::from_catalog(catalog).unwrap();

        assert!(store.get_table(2).unwrap().is_bucketed());
        assert_eq!(store.list_shards(2).unwrap()[0].bucket_number, Some(3));
    }
}
