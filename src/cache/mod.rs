//! Cache Module
//!
//! Provides the in-memory cache engine with TTL-driven removal and operation counters.

mod entry;
mod stats;
mod store;


// Re-export public types
pub(crate) use entry::CacheEntry;
pub use stats::CacheStats;
pub(crate) use stats::StatsCounters;
pub use store::Cache;
