//! Organization sets: the planner's output work items

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ShardIndexInfo, Table};

/// Priority of sets discovered by the automatic planner
pub const AUTOMATIC_PRIORITY: i32 = 0;

/// A group of shards to be merged by the shard rewriter
///
/// Membership maps each shard to its companion delete-delta shard, if any,
/// so a shard and its delta always travel together. All members share one
/// bucket number (or none).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationSet {
    table_id: i64,
    supports_delta_delete: bool,
    shards: BTreeMap<Uuid, Option<Uuid>>,
    bucket_number: Option<u32>,
    priority: i32,
}

impl OrganizationSet {
    pub fn new(
        table_id: i64,
        supports_delta_delete: bool,
        shards: BTreeMap<Uuid, Option<Uuid>>,
        bucket_number: Option<u32>,
        priority: i32,
    ) -> Self {
        Self {
            table_id,
            supports_delta_delete,
            shards,
            bucket_number,
            priority,
        }
    }

    /// Builds a set from member shards of `table`.
    ///
    /// # Panics
    ///
    /// Panics if `shards` is empty, repeats a shard, or mixes bucket
    /// numbers. Each indicates a partitioning defect.
    pub fn from_shards<'a>(
        table: &Table,
        shards: impl IntoIterator<Item = &'a ShardIndexInfo>,
        priority: i32,
    ) -> Self {
        let mut members = BTreeMap::new();
        let mut bucket_number: Option<Option<u32>> = None;

        for shard in shards {
            match bucket_number {
                None => bucket_number = Some(shard.bucket_number),
                Some(bucket) => assert_eq!(
                    bucket, shard.bucket_number,
                    "organization set for table {} mixes bucket numbers",
                    table.table_id
                ),
            }
            let previous = members.insert(shard.shard_uuid, shard.delta_shard_uuid);
            assert!(
                previous.is_none(),
                "shard {} appears twice in one organization set",
                shard.shard_uuid
            );
        }

        let bucket_number = bucket_number.unwrap_or_else(|| {
            panic!("organization set for table {} has no shards", table.table_id)
        });

        Self::new(
            table.table_id,
            table.supports_delta_delete,
            members,
            bucket_number,
            priority,
        )
    }

    pub fn table_id(&self) -> i64 {
        self.table_id
    }

    pub fn supports_delta_delete(&self) -> bool {
        self.supports_delta_delete
    }

    /// Member shards mapped to their delete-delta shards
    pub fn shards(&self) -> &BTreeMap<Uuid, Option<Uuid>> {
        &self.shards
    }

    pub fn shard_uuids(&self) -> impl Iterator<Item = &Uuid> {
        self.shards.keys()
    }

    pub fn bucket_number(&self) -> Option<u32> {
        self.bucket_number
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    pub fn contains(&self, shard_uuid: &Uuid) -> bool {
        self.shards.contains_key(shard_uuid)
    }
}

impl fmt::Display for OrganizationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table={} shards={}", self.table_id, self.shards.len())?;
        if let Some(bucket) = self.bucket_number {
            write!(f, " bucket={}", bucket)?;
        }
        write!(f, " priority={}", self.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shard(bucket: Option<u32>) -> ShardIndexInfo {
        let shard = ShardIndexInfo::new(1, Uuid::new_v4(), 1, 1);
        match bucket {
            Some(b) => shard.with_bucket(b),
            None => shard,
        }
    }

    #[test]
    fn test_from_shards_carries_delta_pairing() {
        let table = Table::new(1).with_delta_delete(true);
        let delta = Uuid::new_v4();
        let a = shard(None).with_delta(delta);
        let b = shard(None);

        let set = OrganizationSet::from_shards(&table, [&a, &b], AUTOMATIC_PRIORITY);

        assert_eq!(set.len(), 2);
        assert_eq!(set.shards()[&a.shard_uuid], Some(delta));
        assert_eq!(set.shards()[&b.shard_uuid], None);
        assert!(set.supports_delta_delete());
        assert_eq!(set.bucket_number(), None);
        assert_eq!(set.priority(), 0);
    }

    #[test]
    fn test_from_shards_shared_bucket() {
        let table = Table::new(1).with_buckets(4);
        let a = shard(Some(2));
        let b = shard(Some(2));
        let set = OrganizationSet::from_shards(&table, [&a, &b], 5);
        assert_eq!(set.bucket_number(), Some(2));
        assert_eq!(set.priority(), 5);
        assert_eq!(set.to_string(), "table=1 shards=2 bucket=2 priority=5");
    }

    #[test]
    #[should_panic(expected = "mixes bucket numbers")]
    fn test_mixed_buckets_fail_loudly() {
        let table = Table::new(1).with_buckets(4);
        let a = shard(Some(1));
        let b = shard(Some(2));
        OrganizationSet::from_shards(&table, [&a, &b], AUTOMATIC_PRIORITY);
    }

    #[test]
    #[should_panic(expected = "appears twice")]
    fn test_duplicate_member_fails_loudly() {
        let table = Table::new(1);
        let a = shard(None);
        OrganizationSet::from_shards(&table, [&a, &a], AUTOMATIC_PRIORITY);
    }

    #[test]
    #[should_panic(expected = "has no shards")]
    fn test_empty_set_fails_loudly() {
        let table = Table::new(1);
        OrganizationSet::from_shards(&table, std::iter::empty(), AUTOMATIC_PRIORITY);
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let table = Table::new(1);
        let a = shard(None);
        let b = shard(None);
        assert_eq!(
            OrganizationSet::from_shards(&table, [&a, &b], 0),
            OrganizationSet::from_shards(&table, [&b, &a], 0)
        );
    }
}
