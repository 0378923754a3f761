//! Shard organization planning
//!
//! Partitions a table's eligible shards into compatible groups and packs the
//! small ones into organization sets for the shard rewriter.

mod compaction;
mod partition;
mod planner;
mod set;

pub use compaction::{CompactionPlan, CompactionSetCreator, CompactionStats};
pub use partition::{partition_shards, ShardGroup};
pub use planner::CompactionPlanner;
pub use set::{OrganizationSet, AUTOMATIC_PRIORITY};
