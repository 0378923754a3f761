//! Partitioning of eligible shards into disjoint candidate groups
//!
//! Shards from different groups are never compacted together. The scheme
//! follows the table:
//! 1. Neither bucketed nor temporal: one group with every shard
//! 2. Bucketed only: one group per bucket number
//! 3. Temporal: one group per day index, split further by bucket number
//!    when the table is also bucketed. Shards without a temporal range are
//!    dropped.
//!
//! Groups appear in first-seen order and keep their members in input order,
//! so the downstream greedy walk is deterministic.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use crate::model::{ShardIndexInfo, Table};
use crate::temporal::TemporalFunction;

/// Shards that may be compacted together
#[derive(Debug, Clone, PartialEq)]
pub struct ShardGroup<'a> {
    /// Day index shared by all members, for temporal tables
    pub day: Option<i64>,
    /// Bucket number shared by all members, for bucketed tables
    pub bucket_number: Option<u32>,
    pub shards: Vec<&'a ShardIndexInfo>,
}

impl ShardGroup<'_> {
    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}

/// Splits `shards` into disjoint groups according to `table`'s partitioning.
pub fn partition_shards<'a>(
    table: &Table,
    shards: &'a [ShardIndexInfo],
    temporal: &TemporalFunction,
) -> Vec<ShardGroup<'a>> {
    if shards.is_empty() {
        return Vec::new();
    }

    if !table.is_temporal() {
        if !table.is_bucketed() {
            return vec![ShardGroup {
                day: None,
                bucket_number: None,
                shards: shards.iter().collect(),
            }];
        }
        return group_by(shards.iter().map(|shard| (shard.bucket_number, shard)))
            .into_iter()
            .map(|(bucket_number, shards)| ShardGroup {
                day: None,
                bucket_number,
                shards,
            })
            .collect();
    }

    let by_day = group_by(shards.iter().filter_map(|shard| {
        shard
            .temporal_range
            .as_ref()
            .map(|range| (temporal.day_from_range(range), shard))
    }));

    if !table.is_bucketed() {
        return by_day
            .into_iter()
            .map(|(day, shards)| ShardGroup {
                day: Some(day),
                bucket_number: None,
                shards,
            })
            .collect();
    }

    by_day
        .into_iter()
        .flat_map(|(day, shards)| {
            group_by(shards.into_iter().map(|shard| (shard.bucket_number, shard)))
                .into_iter()
                .map(move |(bucket_number, shards)| ShardGroup {
                    day: Some(day),
                    bucket_number,
                    shards,
                })
        })
        .collect()
}

/// Groups items by key, keeping keys in first-seen order and values in input order
fn group_by<'a, K>(
    items: impl IntoIterator<Item = (K, &'a ShardIndexInfo)>,
) -> Vec<(K, Vec<&'a ShardIndexInfo>)>
where
    K: Copy + Eq + Hash,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a ShardIndexInfo>)> = Vec::new();

    for (key, shard) in items {
        match positions.entry(key) {
            Entry::Occupied(entry) => groups[*entry.get()].1.push(shard),
            Entry::Vacant(entry) => {
                entry.insert(groups.len());
                groups.push((key, vec![shard]));
            }
        }
    }

    groups
}
