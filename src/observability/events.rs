//! Observable planner events
//!
//! Events are explicit and typed; the string form is what appears in the
//! `event` field of a log line.

use std::fmt;

/// Observable events of a planning pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Planner configuration loaded
    ConfigLoaded,
    /// Catalog loaded into an in-memory store
    CatalogLoaded,

    // Extraction
    /// One batch of shard index statistics fetched
    IndexBatchQueried,
    /// Shard dropped for a missing range or index row
    ShardRangeMissing,
    /// Eligible shards resolved for a table
    ShardsResolved,

    // Planning
    /// Organization set emitted
    SetEmitted,
    /// Compaction sets built for a table
    SetsCreated,
    /// Counters reported at the end of a CLI run
    MetricsReported,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogLoaded => "CATALOG_LOADED",
            Event::IndexBatchQueried => "SHARD_INDEX_BATCH",
            Event::ShardRangeMissing => "SHARD_RANGE_MISSING",
            Event::ShardsResolved => "ELIGIBLE_SHARDS_RESOLVED",
            Event::SetEmitted => "ORGANIZATION_SET_EMITTED",
            Event::SetsCreated => "COMPACTION_SETS_CREATED",
            Event::MetricsReported => "PLANNER_METRICS",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
