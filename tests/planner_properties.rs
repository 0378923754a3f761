//! Compaction Planner Property Tests
//!
//! Randomized shard collections over every table shape:
//! - No emitted set has a single member
//! - Members share their bucket and, for temporal tables, their day
//! - Sets stay within both thresholds and never hold an adequate shard
//! - No shard is planned twice
//! - Unpartitioned tables get exactly the greedy in-order packing

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use shardplan::model::{ColumnType, ShardIndexInfo, ShardRange, Table};
use shardplan::organization::{CompactionSetCreator, OrganizationSet};
use shardplan::temporal::TemporalFunction;
use uuid::Uuid;

// =============================================================================
// Strategies
// =============================================================================

#[derive(Clone, Debug)]
struct ShardSpec {
    rows: u64,
    bytes: u64,
    bucket: u32,
    day: i64,
}

fn arb_shard() -> impl Strategy<Value = ShardSpec> {
    (0u64..150, 0u64..150, 0u32..3, 0i64..4).prop_map(|(rows, bytes, bucket, day)| ShardSpec {
        rows,
        bytes,
        bucket,
        day,
    })
}

fn arb_table() -> impl Strategy<Value = Table> {
    (any::<bool>(), any::<bool>()).prop_map(|(bucketed, temporal)| {
        let mut table = Table::new(1);
        if bucketed {
            table = table.with_buckets(3);
        }
        if temporal {
            table = table.with_temporal_column(10);
        }
        table
    })
}

fn build(table: &Table, specs: &[ShardSpec]) -> Vec<ShardIndexInfo> {
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let mut shard = ShardIndexInfo::new(1, Uuid::from_u128(i as u128 + 1), spec.rows, spec.bytes);
            if table.is_bucketed() {
                shard = shard.with_bucket(spec.bucket);
            }
            if table.is_temporal() {
                shard = shard.with_temporal_range(ShardRange::single(
                    ColumnType::Date,
                    spec.day,
                    spec.day,
                ));
            }
            shard
        })
        .collect()
}

/// In-order greedy packing of one group, as sets of member indexes
fn reference_greedy(shards: &[ShardIndexInfo], max_bytes: u64, max_rows: u64) -> Vec<Vec<usize>> {
    let mut sets = Vec::new();
    let mut working: Vec<usize> = Vec::new();
    let (mut rows, mut bytes) = (0u64, 0u64);

    for (i, shard) in shards.iter().enumerate() {
        if shard.row_count >= max_rows || shard.uncompressed_size >= max_bytes {
            continue;
        }
        if !working.is_empty()
            && (rows + shard.row_count > max_rows || bytes + shard.uncompressed_size > max_bytes)
        {
            if working.len() > 1 {
                sets.push(working.clone());
            }
            working.clear();
            rows = 0;
            bytes = 0;
        }
        working.push(i);
        rows += shard.row_count;
        bytes += shard.uncompressed_size;
    }
    if working.len() > 1 {
        sets.push(working);
    }
    sets
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn emitted_sets_respect_partitions_and_thresholds(
        table in arb_table(),
        specs in prop::collection::vec(arb_shard(), 0..40),
        max_bytes in 0u64..300,
        max_rows in 0u64..300,
    ) {
        let shards = build(&table, &specs);
        let by_uuid: HashMap<Uuid, &ShardIndexInfo> =
            shards.iter().map(|shard| (shard.shard_uuid, shard)).collect();
        let creator = CompactionSetCreator::new(TemporalFunction::utc(), max_bytes, max_rows);

        let sets = creator.create_compaction_sets(&table, &shards);

        let mut seen = HashSet::new();
        for set in &sets {
            prop_assert!(set.len() >= 2);
            prop_assert_eq!(set.priority(), 0);

            let members: Vec<&ShardIndexInfo> =
                set.shard_uuids().map(|uuid| by_uuid[uuid]).collect();
            let rows: u64 = members.iter().map(|shard| shard.row_count).sum();
            let bytes: u64 = members.iter().map(|shard| shard.uncompressed_size).sum();
            prop_assert!(rows <= max_rows);
            prop_assert!(bytes <= max_bytes);

            for shard in &members {
                prop_assert!(seen.insert(shard.shard_uuid));
                prop_assert!(shard.row_count < max_rows);
                prop_assert!(shard.uncompressed_size < max_bytes);
                prop_assert_eq!(shard.bucket_number, set.bucket_number());
                prop_assert_eq!(&shard.temporal_range, &members[0].temporal_range);
            }
        }
    }

    #[test]
    fn unpartitioned_tables_get_greedy_packing(
        specs in prop::collection::vec(arb_shard(), 0..40),
        max_bytes in 1u64..300,
        max_rows in 1u64..300,
    ) {
        let table = Table::new(1);
        let shards = build(&table, &specs);
        let creator = CompactionSetCreator::new(TemporalFunction::utc(), max_bytes, max_rows);

        let actual: Vec<HashSet<Uuid>> = creator
            .create_compaction_sets(&table, &shards)
            .iter()
            .map(|set| set.shard_uuids().copied().collect())
            .collect();
        let expected: Vec<HashSet<Uuid>> = reference_greedy(&shards, max_bytes, max_rows)
            .into_iter()
            .map(|set| set.into_iter().map(|i| shards[i].shard_uuid).collect())
            .collect();

        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn planning_is_idempotent(
        table in arb_table(),
        specs in prop::collection::vec(arb_shard(), 0..40),
        max_bytes in 0u64..300,
        max_rows in 0u64..300,
    ) {
        let shards = build(&table, &specs);
        let creator = CompactionSetCreator::new(TemporalFunction::utc(), max_bytes, max_rows);

        let first: HashSet<OrganizationSet> =
            creator.create_compaction_sets(&table, &shards).into_iter().collect();
        let second: HashSet<OrganizationSet> =
            creator.create_compaction_sets(&table, &shards).into_iter().collect();

        prop_assert_eq!(first, second);
    }
}
