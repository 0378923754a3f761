//! Raw shard index rows and their decoding into ranges

use serde::{Deserialize, Serialize};

use crate::model::{ShardRange, TableColumn, Tuple, Value};

/// One row of a shard index query
///
/// `mins[i]` and `maxs[i]` hold the statistics of the i-th requested
/// column; `None` is a null statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRow {
    pub shard_id: i64,
    pub mins: Vec<Option<Value>>,
    pub maxs: Vec<Option<Value>>,
}

impl IndexRow {
    pub fn new(shard_id: i64, mins: Vec<Option<Value>>, maxs: Vec<Option<Value>>) -> Self {
        Self {
            shard_id,
            mins,
            maxs,
        }
    }
}

/// Decodes the range over `columns`, read from `row` starting at `offset`.
///
/// Returns `None` if any min or max is null, missing, or not stored as its
/// column type requires.
pub fn decode_range(columns: &[TableColumn], row: &IndexRow, offset: usize) -> Option<ShardRange> {
    let mut types = Vec::with_capacity(columns.len());
    let mut mins = Vec::with_capacity(columns.len());
    let mut maxs = Vec::with_capacity(columns.len());

    for (i, column) in columns.iter().enumerate() {
        let min = row.mins.get(offset + i)?.as_ref()?;
        let max = row.maxs.get(offset + i)?.as_ref()?;
        if !column.data_type.accepts(min) || !column.data_type.accepts(max) {
            return None;
        }
        types.push(column.data_type);
        mins.push(min.clone());
        maxs.push(max.clone());
    }

    Some(ShardRange::new(
        Tuple::new(types.clone(), mins),
        Tuple::new(types, maxs),
    ))
}
