//! Benchmark Report
//!
//! Final figures produced by a benchmark run.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::tasks::ExpiryPolicy;

/// Summary of one benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Expiry policy of the cache under test
    pub policy: ExpiryPolicy,
    /// Time from start until every burst had finished
    pub elapsed_secs: f64,
    /// Number of bursts launched
    pub bursts: usize,
    /// Cache size once all bursts had finished
    pub final_size: usize,
    /// Counted operations per second over the whole run
    pub ops_per_sec: f64,
    /// Counter snapshot taken at the end of the run
    pub stats: CacheStats,
}

impl BenchReport {
    /// Creates a report, deriving throughput from the counters.
    pub fn new(
        started_at: DateTime<Utc>,
        policy: ExpiryPolicy,
        elapsed: Duration,
        bursts: usize,
        final_size: usize,
        stats: CacheStats,
    ) -> Self {
        let elapsed_secs = elapsed.as_secs_f64();
        Self {
            started_at,
            policy,
            elapsed_secs,
            bursts,
            final_size,
            ops_per_sec: stats.throughput(elapsed_secs),
            stats,
        }
    }

    /// One-line human readable summary of the counters.
    pub fn summary(&self) -> String {
        format!(
            "Execution time: {:.3}s, Total: {}, Gets: {}, Sets: {}, Has: {}, Deletes: {}",
            self.elapsed_secs,
            self.stats.total,
            self.stats.gets,
            self.stats.sets,
            self.stats.has_checks,
            self.stats.deletes
        )
    }
}
