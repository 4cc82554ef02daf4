//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use crate::tasks::RemovalHandle;

// == Cache Entry ==
/// A stored value plus the bookkeeping its removal action needs.
///
/// No expiry timestamp lives here. Expiration is carried out by a removal action
/// scheduled when the entry was written, never by checking staleness on read.
#[derive(Debug)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Write sequence number, unique per `set` within one cache
    pub generation: u64,
    /// Pending removal action, only tracked when it may be canceled
    removal: Option<RemovalHandle>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry with no tracked removal action.
    pub fn new(value: String, generation: u64) -> Self {
        Self {
            value,
            generation,
            removal: None,
        }
    }

    /// Returns a copy of the value as raw bytes.
    pub fn value_bytes(&self) -> Vec<u8> {
        self.value.as_bytes().to_vec()
    }

    // == Removal Tracking ==
    /// Remembers the removal action scheduled for this entry.
    pub fn attach_removal(&mut self, handle: RemovalHandle) {
        self.removal = Some(handle);
    }

    /// Cancels the attached removal action, if any.
    pub fn cancel_removal(&mut self) {
        if let Some(handle) = self.removal.take() {
            handle.cancel();
        }
    }
}
