//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Error type for cache operations.
///
/// A lookup miss is the only failure the engine can report. Expired entries are
/// removed outright, so an expired key is indistinguishable from one never set.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// Key not present in the cache
    #[error("no element in cache at given key")]
    NotFound,
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
