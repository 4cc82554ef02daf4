//! TTL Cache - A concurrent in-process key/value cache
//!
//! Provides thread-safe storage with per-entry TTL expiration and operation counters.

pub mod bench;
pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::ExpiryPolicy;
