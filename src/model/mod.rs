//! Shard index model
//!
//! Immutable value types read from the metadata store and handed to the
//! compaction planner:
//! - Typed column values and their native ordering
//! - Tuples and min/max shard ranges
//! - Shard records (bare and range-annotated)
//! - Table and column descriptors
//!
//! Relationships (shard → table, shard → delta shard) are plain identifier
//! fields. Nothing here is mutated after construction.

mod shard;
mod table;
mod tuple;
mod value;

pub use shard::{ShardIndexInfo, ShardMetadata};
pub use table::{Table, TableColumn};
pub use tuple::{ShardRange, Tuple};
pub use value::{ColumnType, Value};
