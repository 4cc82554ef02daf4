//! Background Tasks Module
//!
//! Contains the deferred work the cache schedules on its own.
//!
//! # Tasks
//! - TTL Removal: deletes a key once the TTL given to `set` has elapsed

mod expiry;

pub use expiry::{ExpiryPolicy, ParseExpiryPolicyError};
pub(crate) use expiry::{ExpiryScheduler, RemovalHandle};
