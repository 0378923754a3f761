//! Planner counters
//!
//! - Counters only, monotonic, reset only when the registry is created
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::metadata::EligibleShards;
use crate::organization::CompactionStats;

/// Counters accumulated over planning passes
///
/// All counters use Relaxed ordering; values are exact once the passes
/// that produced them have returned.
#[derive(Debug, Default)]
pub struct PlannerMetrics {
    /// Planning passes started
    passes: AtomicU64,
    /// Planning passes aborted by a metadata error
    passes_failed: AtomicU64,
    /// Organization sets emitted
    sets_emitted: AtomicU64,
    /// Shards placed into emitted sets
    shards_planned: AtomicU64,
    /// Shards left alone because they already meet a threshold
    shards_adequate: AtomicU64,
    /// Closed single-shard sets that were discarded
    singletons_discarded: AtomicU64,
    /// Shard index queries issued
    index_queries: AtomicU64,
    /// Shards dropped for a missing range
    shards_dropped: AtomicU64,
    /// Delta shards skipped during extraction
    deltas_skipped: AtomicU64,
}

impl PlannerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_passes(&self) {
        self.passes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_passes_failed(&self) {
        self.passes_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Folds the counters of one extraction into the registry
    pub fn record_extraction(&self, eligible: &EligibleShards) {
        self.index_queries
            .fetch_add(eligible.index_queries, Ordering::Relaxed);
        self.shards_dropped.fetch_add(eligible.dropped, Ordering::Relaxed);
        self.deltas_skipped.fetch_add(eligible.deltas, Ordering::Relaxed);
    }

    /// Folds the counters of one creator run into the registry
    pub fn record_plan(&self, sets: usize, stats: &CompactionStats) {
        self.sets_emitted.fetch_add(sets as u64, Ordering::Relaxed);
        self.shards_planned.fetch_add(stats.planned, Ordering::Relaxed);
        self.shards_adequate.fetch_add(stats.adequate, Ordering::Relaxed);
        self.singletons_discarded
            .fetch_add(stats.singletons, Ordering::Relaxed);
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            passes: self.passes.load(Ordering::Relaxed),
            passes_failed: self.passes_failed.load(Ordering::Relaxed),
            sets_emitted: self.sets_emitted.load(Ordering::Relaxed),
            shards_planned: self.shards_planned.load(Ordering::Relaxed),
            shards_adequate: self.shards_adequate.load(Ordering::Relaxed),
            singletons_discarded: self.singletons_discarded.load(Ordering::Relaxed),
            index_queries: self.index_queries.load(Ordering::Relaxed),
            shards_dropped: self.shards_dropped.load(Ordering::Relaxed),
            deltas_skipped: self.deltas_skipped.load(Ordering::Relaxed),
        }
    }

    /// Current counters as one JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub passes: u64,
    pub passes_failed: u64,
    pub sets_emitted: u64,
    pub shards_planned: u64,
    pub shards_adequate: u64,
    pub singletons_discarded: u64,
    pub index_queries: u64,
    pub shards_dropped: u64,
    pub deltas_skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_zero() {
        assert_eq!(PlannerMetrics::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_record_plan_and_extraction() {
        let metrics = PlannerMetrics::new();
        metrics.increment_passes();
        metrics.record_extraction(&EligibleShards {
            shards: Vec::new(),
            index_queries: 3,
            deltas: 1,
            dropped: 2,
        });
        metrics.record_plan(
            2,
            &CompactionStats {
                groups: 1,
                candidates: 5,
                adequate: 4,
                deltas: 0,
                singletons: 1,
                planned: 4,
            },
        );

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.passes, 1);
        assert_eq!(snapshot.index_queries, 3);
        assert_eq!(snapshot.shards_dropped, 2);
        assert_eq!(snapshot.deltas_skipped, 1);
        assert_eq!(snapshot.sets_emitted, 2);
        assert_eq!(snapshot.shards_planned, 4);
        assert_eq!(snapshot.shards_adequate, 4);
        assert_eq!(snapshot.singletons_discarded, 1);
    }

    #[test]
    fn test_to_json() {
        let metrics = PlannerMetrics::new();
        metrics.increment_passes();
        metrics.increment_passes_failed();

        let parsed: serde_json::Value = serde_json::from_str(&metrics.to_json()).unwrap();
        assert_eq!(parsed["passes"], 1);
        assert_eq!(parsed["passes_failed"], 1);
        assert_eq!(parsed["sets_emitted"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let metrics = Arc::new(PlannerMetrics::new());
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..100 {
                        metrics.increment_passes();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.snapshot().passes, 1000);
    }
}
