//! Cache Statistics Module
//!
//! Tracks how many times each cache operation has been invoked.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Stats Counters ==
/// Live operation counters owned by the engine.
///
/// Increments happen while the engine lock is held. Reads go straight to the
/// atomics without the lock, so a snapshot taken during concurrent activity is
/// weakly consistent: each counter is exact at some instant, but the four
/// counters may be observed at different instants.
#[derive(Debug, Default)]
pub struct StatsCounters {
    gets: AtomicU64,
    sets: AtomicU64,
    has_checks: AtomicU64,
    deletes: AtomicU64,
}

impl StatsCounters {
    // == Constructor ==
    /// Creates a counter block with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Operations ==
    /// Increments the get counter.
    pub fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the set counter.
    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the has-check counter.
    pub fn record_has(&self) {
        self.has_checks.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the delete counter.
    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Reads all counters without locking.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats::new(
            self.gets.load(Ordering::Relaxed),
            self.sets.load(Ordering::Relaxed),
            self.has_checks.load(Ordering::Relaxed),
            self.deletes.load(Ordering::Relaxed),
        )
    }
}

// == Cache Stats ==
/// Point-in-time view of the operation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Sum of the four counters below
    pub total: u64,
    /// Number of `get` calls
    pub gets: u64,
    /// Number of `set` calls
    pub sets: u64,
    /// Number of `has` calls
    pub has_checks: u64,
    /// Number of `delete` calls, including fired removal actions
    pub deletes: u64,
}

impl CacheStats {
    /// Builds a snapshot, deriving `total` from the four counters.
    pub fn new(gets: u64, sets: u64, has_checks: u64, deletes: u64) -> Self {
        Self {
            total: gets + sets + has_checks + deletes,
            gets,
            sets,
            has_checks,
            deletes,
        }
    }

    /// Operations per second over the given number of seconds.
    pub fn throughput(&self, elapsed_secs: f64) -> f64 {
        if elapsed_secs <= 0.0 {
            0.0
        } else {
            self.total as f64 / elapsed_secs
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_new() {
        let stats = StatsCounters::new().snapshot();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.total, 0);
    }

    #[test]
    fn test_record_each_kind() {
        let counters = StatsCounters::new();
        counters.record_get();
        counters.record_get();
        counters.record_set();
        counters.record_has();
        counters.record_has();
        counters.record_has();
        counters.record_delete();

        let stats = counters.snapshot();
        assert_eq!(stats.gets, 2);
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.has_checks, 3);
        assert_eq!(stats.deletes, 1);
        assert_eq!(stats.total, 7);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let counters = StatsCounters::new();
        counters.record_set();
        let before = counters.snapshot();
        counters.record_set();

        assert_eq!(before.sets, 1);
        assert_eq!(counters.snapshot().sets, 2);
    }

    #[test]
    fn test_throughput() {
        let stats = CacheStats::new(10, 10, 0, 0);
        assert_eq!(stats.throughput(2.0), 10.0);
        assert_eq!(stats.throughput(0.0), 0.0);
    }

    #[test]
    fn test_stats_serialize() {
        let json = serde_json::to_string(&CacheStats::new(1, 2, 3, 4)).unwrap();
        assert!(json.contains("\"total\":10"));
        assert!(json.contains("\"has_checks\":3"));
    }
}
