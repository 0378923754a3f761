//! One planning pass over the metadata store
//!
//! `plan_table` = table lookup, shard listing, eligible-shard extraction,
//! compaction set creation. Metadata errors abort the pass unchanged; no
//! partial result is returned for the failing table.

use std::collections::HashMap;

use uuid::Uuid;

use crate::metadata::{list_eligible_shards, EligibilityOptions, MetadataResult, MetadataStore};
use crate::model::ShardIndexInfo;
use crate::observability::{log_event, Event, Logger, ObservationScope, PlannerMetrics};

use super::compaction::CompactionSetCreator;
use super::set::OrganizationSet;

/// Drives the creator against a metadata store
pub struct CompactionPlanner<'a, S: MetadataStore + ?Sized> {
    store: &'a S,
    creator: CompactionSetCreator,
    options: EligibilityOptions,
    metrics: PlannerMetrics,
}

impl<'a, S: MetadataStore + ?Sized> CompactionPlanner<'a, S> {
    pub fn new(store: &'a S, creator: CompactionSetCreator, options: EligibilityOptions) -> Self {
        Self {
            store,
            creator,
            options,
            metrics: PlannerMetrics::new(),
        }
    }

    pub fn creator(&self) -> &CompactionSetCreator {
        &self.creator
    }

    /// Counters accumulated over every pass run by this planner
    pub fn metrics(&self) -> &PlannerMetrics {
        &self.metrics
    }

    /// Organization sets for one table
    pub fn plan_table(&self, table_id: i64) -> MetadataResult<Vec<OrganizationSet>> {
        let table_field = table_id.to_string();
        let scope = ObservationScope::with_fields("COMPACTION_PLAN", &[("table_id", &table_field)]);
        self.metrics.increment_passes();

        match self.run(table_id) {
            Ok(sets) => {
                scope.complete_with_fields(&[("sets", &sets.len().to_string())]);
                Ok(sets)
            }
            Err(err) => {
                self.metrics.increment_passes_failed();
                scope.fail(err.code(), &err.to_string());
                Err(err)
            }
        }
    }

    /// Organization sets for every table, in ascending table id
    pub fn plan_all(&self) -> MetadataResult<Vec<OrganizationSet>> {
        let mut sets = Vec::new();
        for table in self.store.list_tables()? {
            sets.extend(self.plan_table(table.table_id)?);
        }
        Ok(sets)
    }

    fn run(&self, table_id: i64) -> MetadataResult<Vec<OrganizationSet>> {
        let table = self.store.get_table(table_id)?;
        let eligible = list_eligible_shards(self.store, &table, self.options)?;
        self.metrics.record_extraction(&eligible);

        let table_field = table_id.to_string();
        log_event(
            Event::ShardsResolved,
            &[
                ("table_id", &table_field),
                ("partitioning", table.partitioning()),
                ("eligible", &eligible.shards.len().to_string()),
                ("deltas", &eligible.deltas.to_string()),
                ("dropped", &eligible.dropped.to_string()),
                ("index_queries", &eligible.index_queries.to_string()),
            ],
        );

        let plan = self.creator.plan(&table, &eligible.shards);
        self.metrics.record_plan(plan.sets.len(), &plan.stats);

        let by_uuid: HashMap<Uuid, &ShardIndexInfo> = eligible
            .shards
            .iter()
            .map(|shard| (shard.shard_uuid, shard))
            .collect();
        for set in &plan.sets {
            let (rows, bytes) = set
                .shard_uuids()
                .filter_map(|uuid| by_uuid.get(uuid))
                .fold((0u64, 0u64), |(rows, bytes), shard| {
                    (
                        rows.saturating_add(shard.row_count),
                        bytes.saturating_add(shard.uncompressed_size),
                    )
                });
            let bucket = set
                .bucket_number()
                .map_or_else(|| "none".to_string(), |b| b.to_string());
            Logger::trace(
                Event::SetEmitted.as_str(),
                &[
                    ("table_id", &table_field),
                    ("bucket", &bucket),
                    ("shards", &set.len().to_string()),
                    ("rows", &rows.to_string()),
                    ("bytes", &bytes.to_string()),
                ],
            );
        }

        log_event(
            Event::SetsCreated,
            &[
                ("table_id", &table_field),
                ("groups", &plan.stats.groups.to_string()),
                ("candidates", &plan.stats.candidates.to_string()),
                ("adequate", &plan.stats.adequate.to_string()),
                ("singletons", &plan.stats.singletons.to_string()),
                ("planned", &plan.stats.planned.to_string()),
                ("sets", &plan.sets.len().to_string()),
            ],
        );

        Ok(plan.sets)
    }
}
