//! Table and column descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::ColumnType;

/// Table descriptor, immutable for the duration of a planning pass
///
/// A present `bucket_count` means the table is hash-bucketed; a present
/// `temporal_column_id` means shards are partitioned by day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub table_id: i64,
    #[serde(default)]
    pub distribution_id: Option<i64>,
    #[serde(default)]
    pub distribution_name: Option<String>,
    #[serde(default)]
    pub bucket_count: Option<u32>,
    #[serde(default)]
    pub temporal_column_id: Option<i64>,
    #[serde(default)]
    pub organized: bool,
    #[serde(default)]
    pub supports_delta_delete: bool,
}

impl Table {
    /// Creates an unpartitioned table
    pub fn new(table_id: i64) -> Self {
        Self {
            table_id,
            distribution_id: None,
            distribution_name: None,
            bucket_count: None,
            temporal_column_id: None,
            organized: false,
            supports_delta_delete: false,
        }
    }

    pub fn with_buckets(mut self, bucket_count: u32) -> Self {
        self.bucket_count = Some(bucket_count);
        self
    }

    pub fn with_temporal_column(mut self, column_id: i64) -> Self {
        self.temporal_column_id = Some(column_id);
        self
    }

    pub fn with_distribution(mut self, distribution_id: i64, name: impl Into<String>) -> Self {
        self.distribution_id = Some(distribution_id);
        self.distribution_name = Some(name.into());
        self
    }

    pub fn with_organization(mut self, organized: bool) -> Self {
        self.organized = organized;
        self
    }

    pub fn with_delta_delete(mut self, supports_delta_delete: bool) -> Self {
        self.supports_delta_delete = supports_delta_delete;
        self
    }

    pub fn is_bucketed(&self) -> bool {
        self.bucket_count.is_some()
    }

    pub fn is_temporal(&self) -> bool {
        self.temporal_column_id.is_some()
    }

    /// Short name of the partitioning scheme, used in logs and CLI output
    pub fn partitioning(&self) -> &'static str {
        match (self.is_bucketed(), self.is_temporal()) {
            (false, false) => "none",
            (true, false) => "bucketed",
            (false, true) => "temporal",
            (true, true) => "bucketed_temporal",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table {}", self.table_id)?;
        if let Some(buckets) = self.bucket_count {
            write!(f, " buckets={}", buckets)?;
        }
        if let Some(column_id) = self.temporal_column_id {
            write!(f, " temporal_column={}", column_id)?;
        }
        if let Some(name) = &self.distribution_name {
            write!(f, " distribution={}", name)?;
        }
        Ok(())
    }
}

/// Column descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub table_id: i64,
    pub column_id: i64,
    pub column_name: String,
    pub data_type: ColumnType,
    #[serde(default)]
    pub ordinal_position: u32,
    /// Position within the table's sort key, if the column is part of it
    #[serde(default)]
    pub sort_ordinal_position: Option<u32>,
}

impl TableColumn {
    pub fn new(
        table_id: i64,
        column_id: i64,
        column_name: impl Into<String>,
        data_type: ColumnType,
    ) -> Self {
        Self {
            table_id,
            column_id,
            column_name: column_name.into(),
            data_type,
            ordinal_position: 0,
            sort_ordinal_position: None,
        }
    }

    pub fn with_sort_position(mut self, position: u32) -> Self {
        self.sort_ordinal_position = Some(position);
        self
    }
}
