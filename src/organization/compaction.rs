//! Compaction set creation
//!
//! Within each partition group, shards already at or above either threshold
//! are left alone. The remaining candidates are walked in input order and
//! packed greedily: a set is closed as soon as the next candidate would push
//! its row or byte total past the maximum. Closed sets with a single shard
//! are discarded since compacting one shard with itself gains nothing.
//!
//! The creator is pure: no I/O, no shared state, no failure modes.

use crate::model::{ShardIndexInfo, Table};
use crate::temporal::TemporalFunction;

use super::partition::{partition_shards, ShardGroup};
use super::set::{OrganizationSet, AUTOMATIC_PRIORITY};

/// Counters describing one run of the creator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionStats {
    /// Partition groups examined
    pub groups: u64,
    /// Shards that entered the greedy walk
    pub candidates: u64,
    /// Shards skipped because they already meet a threshold
    pub adequate: u64,
    /// Delete-delta shards skipped as top-level candidates
    pub deltas: u64,
    /// Closed single-shard sets that were dropped
    pub singletons: u64,
    /// Shards placed into emitted sets
    pub planned: u64,
}

/// Result of one run: the emitted sets and the counters behind them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactionPlan {
    pub sets: Vec<OrganizationSet>,
    pub stats: CompactionStats,
}

/// Greedy packer of small shards into organization sets
#[derive(Debug, Clone)]
pub struct CompactionSetCreator {
    temporal: TemporalFunction,
    max_shard_size_bytes: u64,
    max_shard_rows: u64,
}

impl CompactionSetCreator {
    pub fn new(temporal: TemporalFunction, max_shard_size_bytes: u64, max_shard_rows: u64) -> Self {
        Self {
            temporal,
            max_shard_size_bytes,
            max_shard_rows,
        }
    }

    pub fn max_shard_size_bytes(&self) -> u64 {
        self.max_shard_size_bytes
    }

    pub fn max_shard_rows(&self) -> u64 {
        self.max_shard_rows
    }

    pub fn temporal(&self) -> &TemporalFunction {
        &self.temporal
    }

    /// Organization sets for `shards` of `table`, in group order then walk order.
    pub fn create_compaction_sets(
        &self,
        table: &Table,
        shards: &[ShardIndexInfo],
    ) -> Vec<OrganizationSet> {
        self.plan(table, shards).sets
    }

    /// Same as [`create_compaction_sets`](Self::create_compaction_sets), also
    /// returning the counters gathered on the way.
    pub fn plan(&self, table: &Table, shards: &[ShardIndexInfo]) -> CompactionPlan {
        let mut sets = Vec::new();
        let mut stats = CompactionStats::default();

        for group in partition_shards(table, shards, &self.temporal) {
            stats.groups += 1;
            self.build_sets(table, &group, &mut stats, &mut sets);
        }

        CompactionPlan { sets, stats }
    }

    /// True when a shard alone meets either threshold
    pub fn is_adequate(&self, shard: &ShardIndexInfo) -> bool {
        shard.row_count >= self.max_shard_rows || shard.uncompressed_size >= self.max_shard_size_bytes
    }

    fn build_sets<'a>(
        &self,
        table: &Table,
        group: &ShardGroup<'a>,
        stats: &mut CompactionStats,
        sets: &mut Vec<OrganizationSet>,
    ) {
        let mut working: Vec<&'a ShardIndexInfo> = Vec::new();
        let mut rows = 0u64;
        let mut bytes = 0u64;

        for &shard in &group.shards {
            if shard.is_delta {
                stats.deltas += 1;
                continue;
            }
            if self.is_adequate(shard) {
                stats.adequate += 1;
                continue;
            }
            stats.candidates += 1;

            // an overflowing total exceeds any threshold
            let next = rows
                .checked_add(shard.row_count)
                .zip(bytes.checked_add(shard.uncompressed_size))
                .filter(|&(next_rows, next_bytes)| {
                    next_rows <= self.max_shard_rows && next_bytes <= self.max_shard_size_bytes
                });
            match next {
                Some((next_rows, next_bytes)) => {
                    rows = next_rows;
                    bytes = next_bytes;
                }
                None => {
                    close_set(table, &mut working, stats, sets);
                    rows = shard.row_count;
                    bytes = shard.uncompressed_size;
                }
            }
            working.push(shard);
        }

        close_set(table, &mut working, stats, sets);
    }
}

/// Emits the working set if it has at least two shards, then clears it
fn close_set(
    table: &Table,
    working: &mut Vec<&ShardIndexInfo>,
    stats: &mut CompactionStats,
    sets: &mut Vec<OrganizationSet>,
) {
    match working.len() {
        0 => {}
        1 => stats.singletons += 1,
        n => {
            stats.planned += n as u64;
            sets.push(OrganizationSet::from_shards(
                table,
                working.iter().copied(),
                AUTOMATIC_PRIORITY,
            ));
        }
    }
    working.clear();
}
