//! Shard records

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tuple::ShardRange;

/// Bare shard record as persisted by the metadata store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardMetadata {
    pub table_id: i64,
    /// Store-internal numeric identifier, used to key index queries
    pub shard_id: i64,
    pub shard_uuid: Uuid,
    #[serde(default)]
    pub bucket_number: Option<u32>,
    #[serde(default)]
    pub is_delta: bool,
    #[serde(default)]
    pub delta_uuid: Option<Uuid>,
    #[serde(default)]
    pub row_count: u64,
    #[serde(default)]
    pub compressed_size: u64,
    #[serde(default)]
    pub uncompressed_size: u64,
}

impl ShardMetadata {
    /// Creates a non-delta shard record with no bucket or delta linkage
    pub fn new(
        table_id: i64,
        shard_id: i64,
        shard_uuid: Uuid,
        row_count: u64,
        uncompressed_size: u64,
    ) -> Self {
        Self {
            table_id,
            shard_id,
            shard_uuid,
            bucket_number: None,
            is_delta: false,
            delta_uuid: None,
            row_count,
            compressed_size: 0,
            uncompressed_size,
        }
    }

    pub fn with_bucket(mut self, bucket_number: u32) -> Self {
        self.bucket_number = Some(bucket_number);
        self
    }

    pub fn with_delta(mut self, delta_uuid: Uuid) -> Self {
        self.delta_uuid = Some(delta_uuid);
        self
    }

    /// Marks this record as a delete-delta shard
    pub fn as_delta(mut self) -> Self {
        self.is_delta = true;
        self
    }
}

/// Planner view of one shard: identity, size and typed ranges
///
/// `temporal_range` is present only for tables with a temporal column and
/// `sort_range` only when sort statistics were requested; shards missing a
/// required range never reach the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardIndexInfo {
    pub table_id: i64,
    pub bucket_number: Option<u32>,
    pub shard_uuid: Uuid,
    pub is_delta: bool,
    pub delta_shard_uuid: Option<Uuid>,
    pub row_count: u64,
    pub uncompressed_size: u64,
    pub sort_range: Option<ShardRange>,
    pub temporal_range: Option<ShardRange>,
}

impl ShardIndexInfo {
    /// Creates a shard with no bucket, delta linkage or ranges
    pub fn new(table_id: i64, shard_uuid: Uuid, row_count: u64, uncompressed_size: u64) -> Self {
        Self {
            table_id,
            bucket_number: None,
            shard_uuid,
            is_delta: false,
            delta_shard_uuid: None,
            row_count,
            uncompressed_size,
            sort_range: None,
            temporal_range: None,
        }
    }

    /// Builds the planner view from a bare record and its resolved ranges
    pub fn from_metadata(
        shard: &ShardMetadata,
        temporal_range: Option<ShardRange>,
        sort_range: Option<ShardRange>,
    ) -> Self {
        Self {
            table_id: shard.table_id,
            bucket_number: shard.bucket_number,
            shard_uuid: shard.shard_uuid,
            is_delta: shard.is_delta,
            delta_shard_uuid: shard.delta_uuid,
            row_count: shard.row_count,
            uncompressed_size: shard.uncompressed_size,
            sort_range,
            temporal_range,
        }
    }

    pub fn with_bucket(mut self, bucket_number: u32) -> Self {
        self.bucket_number = Some(bucket_number);
        self
    }

    pub fn with_delta(mut self, delta_shard_uuid: Uuid) -> Self {
        self.delta_shard_uuid = Some(delta_shard_uuid);
        self
    }

    pub fn with_temporal_range(mut self, range: ShardRange) -> Self {
        self.temporal_range = Some(range);
        self
    }

    pub fn with_sort_range(mut self, range: ShardRange) -> Self {
        self.sort_range = Some(range);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;

    #[test]
    fn test_from_metadata_copies_linkage() {
        let delta = Uuid::new_v4();
        let meta = ShardMetadata::new(7, 42, Uuid::new_v4(), 100, 2048)
            .with_bucket(3)
            .with_delta(delta);
        let range = ShardRange::single(ColumnType::Date, 5, 6);

        let info = ShardIndexInfo::from_metadata(&meta, Some(range.clone()), None);

        assert_eq!(info.table_id, 7);
        assert_eq!(info.shard_uuid, meta.shard_uuid);
        assert_eq!(info.bucket_number, Some(3));
        assert_eq!(info.delta_shard_uuid, Some(delta));
        assert_eq!(info.row_count, 100);
        assert_eq!(info.uncompressed_size, 2048);
        assert_eq!(info.temporal_range, Some(range));
        assert!(info.sort_range.is_none());
        assert!(!info.is_delta);
    }

    #[test]
    fn test_metadata_json_defaults() {
        let json = r#"{
            "table_id": 1,
            "shard_id": 9,
            "shard_uuid": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "row_count": 10,
            "uncompressed_size": 20
        }"#;
        let meta: ShardMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.bucket_number, None);
        assert!(!meta.is_delta);
        assert_eq!(meta.delta_uuid, None);
        assert_eq!(meta.compressed_size, 0);
    }
}
