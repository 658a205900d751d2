//! Timeout-bounded collector execution
//!
//! The runner is the boundary where collection errors stop. Whatever the
//! collector does (fail, hang, return the wrong category) the caller gets a
//! [`CollectorReport`] back and the cache slot gets a value.

use std::time::{Duration, Instant};

use super::{CollectedSnapshot, CollectionError, Collector};
use crate::cache::CacheCategory;

/// Default time budget for one collector run
pub const DEFAULT_COLLECTOR_TIMEOUT: Duration = Duration::from_millis(2500);

/// What a collector run produced
#[derive(Clone, Debug, PartialEq)]
pub enum CollectorOutcome {
    /// A fresh snapshot
    Ready(CollectedSnapshot),
    /// The run failed; `reason` is shown in place of the data
    Unavailable { reason: String },
}

/// Result message for one dispatched collection
#[derive(Clone, Debug, PartialEq)]
pub struct CollectorReport {
    /// Category the run was dispatched for
    pub category: CacheCategory,
    /// Dispatch sequence number, used to drop stale results
    pub seq: u64,
    pub outcome: CollectorOutcome,
    /// Wall time the run took
    pub elapsed: Duration,
}

impl CollectorReport {
    /// Build an unavailable report without running anything
    pub fn unavailable(category: CacheCategory, seq: u64, reason: impl Into<String>) -> Self {
        Self {
            category,
            seq,
            outcome: CollectorOutcome::Unavailable {
                reason: reason.into(),
            },
            elapsed: Duration::ZERO,
        }
    }
}

/// Run `collector` with a time budget, converting every failure into an
/// unavailable outcome
pub async fn run_collector(
    collector: &dyn Collector,
    seq: u64,
    timeout: Duration,
) -> CollectorReport {
    let category = collector.category();
    let started = Instant::now();

    let result = match tokio::time::timeout(timeout, collector.collect()).await {
        Ok(result) => result,
        Err(_) => Err(CollectionError::Timeout(timeout)),
    };
    let elapsed = started.elapsed();

    let outcome = match result {
        Ok(snapshot) if snapshot.category() == category => {
            tracing::debug!(
                category = %category,
                seq,
                elapsed_ms = elapsed.as_millis() as u64,
                "Collector finished"
            );
            CollectorOutcome::Ready(snapshot)
        }
        Ok(snapshot) => {
            tracing::warn!(
                category = %category,
                returned = %snapshot.category(),
                "Collector returned the wrong category"
            );
            CollectorOutcome::Unavailable {
                reason: format!("collector returned {} data", snapshot.category()),
            }
        }
        Err(e) => {
            tracing::warn!(category = %category, seq, error = %e, "Collector failed");
            CollectorOutcome::Unavailable {
                reason: e.to_string(),
            }
        }
    };

    CollectorReport {
        category,
        seq,
        outcome,
        elapsed,
    }
}
