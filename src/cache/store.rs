//! Cache Store Module
//!
//! Main cache engine combining HashMap storage, TTL removal actions and
//! operation counters behind a single lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use crate::cache::{CacheEntry, CacheStats, StatsCounters};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{ExpiryPolicy, ExpiryScheduler};

// == Locked State ==
#[derive(Debug, Default)]
struct State {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Generation handed to the most recent `set`
    last_generation: u64,
}

// == Shared Engine ==
#[derive(Debug)]
struct Shared {
    state: Mutex<State>,
    /// Entry count mirrored after every mutation, read without the lock
    len: AtomicUsize,
    stats: StatsCounters,
    policy: ExpiryPolicy,
    /// Owns the timer thread; dropping it cancels pending removal actions
    scheduler: ExpiryScheduler,
}

impl Shared {
    fn sync_len(&self, state: &State) {
        self.len.store(state.entries.len(), Ordering::Relaxed);
    }

    /// Body of a fired removal action. Counts as a delete.
    fn expire(&self, key: &str, generation: u64) {
        let mut state = self.state.lock();
        self.stats.record_delete();

        let current = state.entries.get(key).map(|entry| entry.generation);
        let remove = match self.policy {
            ExpiryPolicy::EarliestWins => current.is_some(),
            ExpiryPolicy::LatestWins => current == Some(generation),
        };
        if remove {
            // The action is finishing on its own; nothing left to cancel.
            state.entries.remove(key);
            self.sync_len(&state);
        }
        trace!(key, generation, removed = remove, "Removal action fired");
    }
}

// == Cache ==
/// Concurrency-safe key/value cache with per-entry TTL.
///
/// `Cache` is a handle: clones share the same store. `get`, `set`, `has` and
/// `delete` serialize on one exclusive lock. `size` and `stats` skip the lock
/// and are only approximate while other threads are mutating the cache.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ttl_cache::Cache;
///
/// let cache = Cache::new();
/// cache.set("greeting", "hello", Duration::ZERO);
/// assert_eq!(cache.get("greeting").unwrap(), b"hello");
/// assert!(cache.has("greeting"));
///
/// cache.delete("greeting");
/// assert!(cache.get("greeting").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Cache {
    shared: Arc<Shared>,
}

impl Cache {
    // == Constructors ==
    /// Creates an empty cache where the earliest scheduled removal wins.
    pub fn new() -> Self {
        Self::with_policy(ExpiryPolicy::EarliestWins)
    }

    /// Creates an empty cache with the given expiry policy.
    pub fn with_policy(policy: ExpiryPolicy) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                len: AtomicUsize::new(0),
                stats: StatsCounters::new(),
                policy,
                scheduler: ExpiryScheduler::new(),
            }),
        }
    }

    /// Creates an empty cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_policy(config.expiry_policy)
    }

    /// Returns the expiry policy this cache was built with.
    pub fn policy(&self) -> ExpiryPolicy {
        self.shared.policy
    }

    // == Get ==
    /// Retrieves a copy of the value stored at `key`.
    ///
    /// Returns [`CacheError::NotFound`] if the key was never set, was deleted,
    /// or has expired.
    pub fn get(&self, key: &str) -> Result<Vec<u8>> {
        let state = self.shared.state.lock();
        self.shared.stats.record_get();

        state
            .entries
            .get(key)
            .map(CacheEntry::value_bytes)
            .ok_or(CacheError::NotFound)
    }

    // == Set ==
    /// Stores `value` at `key`, overwriting any previous value.
    ///
    /// A non-zero `ttl` schedules a removal action that deletes the key once
    /// `ttl` has elapsed. Under [`ExpiryPolicy::EarliestWins`] earlier actions
    /// for the same key stay armed, so a short TTL from any `set` removes the
    /// key even if a later `set` asked for a longer one.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        let key = key.into();
        let mut state = self.shared.state.lock();
        self.shared.stats.record_set();

        state.last_generation += 1;
        let generation = state.last_generation;
        let mut entry = CacheEntry::new(value.into(), generation);

        if !ttl.is_zero() {
            let shared = Arc::downgrade(&self.shared);
            let removal_key = key.clone();
            let handle = self
                .shared
                .scheduler
                .schedule(ttl, move || fire_removal(&shared, &removal_key, generation));
            if self.shared.policy.tracks_removals() {
                entry.attach_removal(handle);
            }
            trace!(key = %key, generation, ?ttl, "Removal action scheduled");
        }

        if let Some(mut previous) = state.entries.insert(key, entry) {
            previous.cancel_removal();
        }
        self.shared.sync_len(&state);
    }

    // == Has ==
    /// Returns true if `key` is currently present.
    pub fn has(&self, key: &str) -> bool {
        let state = self.shared.state.lock();
        self.shared.stats.record_has();

        state.entries.contains_key(key)
    }

    // == Delete ==
    /// Removes `key` if present. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) {
        let mut state = self.shared.state.lock();
        self.shared.stats.record_delete();

        if let Some(mut removed) = state.entries.remove(key) {
            removed.cancel_removal();
            self.shared.sync_len(&state);
        }
    }

    // == Size ==
    /// Returns the number of stored entries, read without taking the lock.
    ///
    /// Exact when the cache is idle; may lag behind concurrent mutations.
    pub fn size(&self) -> usize {
        self.shared.len.load(Ordering::Relaxed)
    }

    // == Stats ==
    /// Returns a snapshot of the operation counters, read without the lock.
    ///
    /// Under concurrent use the counters may be sampled at slightly different
    /// instants; `total` always equals the sum of the four counters returned.
    pub fn stats(&self) -> CacheStats {
        self.shared.stats.snapshot()
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

fn fire_removal(shared: &Weak<Shared>, key: &str, generation: u64) {
    // Cache already dropped: nothing to remove.
    if let Some(shared) = shared.upgrade() {
        shared.expire(key, generation);
    }
}
