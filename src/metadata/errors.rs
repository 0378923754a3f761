//! # Metadata Store Errors

use thiserror::Error;

use crate::model::ColumnType;

/// Result type for metadata store operations
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Metadata store errors
///
/// Store failures reach the caller of a planning pass unchanged; the
/// planner does not retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("Table not found: {0}")]
    TableNotFound(i64),

    #[error("Column {column_id} not found in table {table_id}")]
    ColumnNotFound { table_id: i64, column_id: i64 },

    #[error("Temporal column {column_id} of table {table_id} has non-temporal type {data_type}")]
    UnsupportedTemporalType {
        table_id: i64,
        column_id: i64,
        data_type: ColumnType,
    },

    // Connection or query failure
    #[error("Metadata store unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MetadataError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            MetadataError::TableNotFound(_) => "SHARD_METADATA_TABLE_NOT_FOUND",
            MetadataError::ColumnNotFound { .. } => "SHARD_METADATA_COLUMN_NOT_FOUND",
            MetadataError::UnsupportedTemporalType { .. } => {
                "SHARD_METADATA_UNSUPPORTED_TEMPORAL_TYPE"
            }
            MetadataError::Unavailable(_) => "SHARD_METADATA_UNAVAILABLE",
            MetadataError::Internal(_) => "SHARD_METADATA_INTERNAL",
        }
    }
}
