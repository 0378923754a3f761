//! shardplan - compaction planning for sharded columnar tables
//!
//! Picks groups of small shards that belong together (same bucket, same
//! day) and packs them into organization sets for a shard rewriter to merge.
//! Planning is pure; the metadata store is read only through
//! [`metadata::MetadataStore`].

pub mod cli;
pub mod config;
pub mod metadata;
pub mod model;
pub mod observability;
pub mod organization;
pub mod temporal;
