//! Observability for the planner
//!
//! - Structured logging (JSON lines on stderr)
//! - Exact counters
//! - Begin/complete scopes around planning passes
//!
//! Observability is read-only: nothing here influences which sets are
//! planned.
//!
//! ```ignore
//! use shardplan::observability::{Event, Logger, ObservationScope, PlannerMetrics};
//!
//! Logger::info(Event::SetsCreated.as_str(), &[("sets", "3")]);
//!
//! let metrics = PlannerMetrics::new();
//! metrics.increment_passes();
//!
//! let scope = ObservationScope::new("COMPACTION_PLAN");
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, PlannerMetrics};
pub use scope::{ObservationScope, Timer};

/// Log an event at INFO
///
/// Pass failures are logged by the pass's [`ObservationScope`] as
/// `{name}_FAILED` at ERROR.
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::info(event.as_str(), fields);
}
