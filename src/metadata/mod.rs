//! Metadata store boundary
//!
//! The planner reads tables, columns, shards and per-shard column statistics
//! through the `MetadataStore` trait. Range annotation happens here, in
//! batches, so the planning core never touches the store.

mod eligible;
mod errors;
mod row;
mod store;

pub use eligible::{
    get_organization_eligible_shards, list_eligible_shards, EligibilityOptions, EligibleShards,
    DEFAULT_INDEX_BATCH_SIZE,
};
pub use errors::{MetadataError, MetadataResult};
pub use row::{decode_range, IndexRow};
pub use store::{Catalog, ColumnStats, InMemoryMetadataStore, MetadataStore};
