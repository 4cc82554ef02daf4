//! TTL Removal Actions
//!
//! Schedules the deferred, one-shot tasks that delete a key once its TTL has
//! elapsed, and defines how overlapping actions for the same key are resolved.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::AbortHandle;
use tracing::debug;

// == Expiry Policy ==
/// Decides which removal action governs a key that was `set` more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPolicy {
    /// Every removal action is independent and none is ever canceled.
    ///
    /// Whichever scheduled removal fires first deletes the key, even when a later
    /// `set` asked for a longer TTL.
    #[default]
    EarliestWins,
    /// Overwriting or deleting an entry cancels its pending removal action, so
    /// the most recent `set` decides when the key expires.
    LatestWins,
}

impl ExpiryPolicy {
    /// Whether entries need to keep a handle on their removal action.
    pub fn tracks_removals(self) -> bool {
        matches!(self, Self::LatestWins)
    }
}

impl fmt::Display for ExpiryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EarliestWins => f.write_str("earliest"),
            Self::LatestWins => f.write_str("latest"),
        }
    }
}

/// Returned when a string names no known [`ExpiryPolicy`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown expiry policy: {0}")]
pub struct ParseExpiryPolicyError(String);

impl FromStr for ExpiryPolicy {
    type Err = ParseExpiryPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "earliest" | "earliest_wins" | "earliest-wins" => Ok(Self::EarliestWins),
            "latest" | "latest_wins" | "latest-wins" => Ok(Self::LatestWins),
            _ => Err(ParseExpiryPolicyError(s.to_string())),
        }
    }
}

// == Removal Handle ==
/// Handle on a scheduled removal action.
#[derive(Debug)]
pub struct RemovalHandle(AbortHandle);

impl RemovalHandle {
    pub(crate) fn new(handle: AbortHandle) -> Self {
        Self(handle)
    }

    /// Cancels the action if it has not fired yet.
    ///
    /// An action already past its sleep may still run; callers must keep the
    /// action itself harmless in that case.
    pub fn cancel(&self) {
        self.0.abort();
    }
}

// == Timer Runtime ==
/// Single-worker runtime that only drives removal actions.
///
/// Started on first use and shut down without blocking when dropped, which
/// also cancels every action still sleeping on it.
#[derive(Debug, Default)]
struct TimerRuntime(OnceLock<Runtime>);

impl TimerRuntime {
    fn handle(&self) -> &Handle {
        self.0.get_or_init(build_timer_runtime).handle()
    }
}

impl Drop for TimerRuntime {
    fn drop(&mut self) {
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

fn build_timer_runtime() -> Runtime {
    debug!("Starting expiry timer runtime");
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("ttl-cache-expiry")
        .enable_time()
        .build()
        .expect("Failed to start expiry timer runtime")
}

// == Expiry Scheduler ==
/// Spawns removal actions onto a timer runtime owned by the scheduler.
///
/// The caller's own runtime is never used, so removal actions keep firing no
/// matter which runtime (if any) the cache was built or called from, and for
/// as long as the scheduler lives.
#[derive(Debug, Default)]
pub struct ExpiryScheduler {
    timer: TimerRuntime,
}

impl ExpiryScheduler {
    /// Creates a scheduler. The timer thread starts with the first action.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `action` once, after `ttl` has elapsed.
    ///
    /// # Example
    /// ```ignore
    /// let scheduler = ExpiryScheduler::new();
    /// let handle = scheduler.schedule(Duration::from_secs(5), move || cache.delete(&key));
    /// // Later, if the removal is no longer wanted:
    /// handle.cancel();
    /// ```
    pub fn schedule<F>(&self, ttl: Duration, action: F) -> RemovalHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let task = self.timer.handle().spawn(async move {
            tokio::time::sleep(ttl).await;
            action();
        });
        RemovalHandle::new(task.abort_handle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("earliest".parse(), Ok(ExpiryPolicy::EarliestWins));
        assert_eq!("Latest-Wins".parse(), Ok(ExpiryPolicy::LatestWins));
        assert_eq!("latest_wins".parse(), Ok(ExpiryPolicy::LatestWins));
        assert!("lru".parse::<ExpiryPolicy>().is_err());
    }

    #[test]
    fn test_policy_display_round_trips() {
        for policy in [ExpiryPolicy::EarliestWins, ExpiryPolicy::LatestWins] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
    }

    #[test]
    fn test_policy_default_and_tracking() {
        assert_eq!(ExpiryPolicy::default(), ExpiryPolicy::EarliestWins);
        assert!(!ExpiryPolicy::EarliestWins.tracks_removals());
        assert!(ExpiryPolicy::LatestWins.tracks_removals());
    }

    #[tokio::test]
    async fn test_schedule_fires_after_ttl() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let scheduler = ExpiryScheduler::new();
        scheduler.schedule(Duration::from_millis(50), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_prevents_action() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let scheduler = ExpiryScheduler::new();
        let handle = scheduler.schedule(Duration::from_millis(50), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        handle.cancel();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_schedule_without_runtime() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let scheduler = ExpiryScheduler::new();
        scheduler.schedule(Duration::from_millis(20), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(200));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_schedule_outlives_creating_runtime() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let scheduler = runtime.block_on(async { ExpiryScheduler::new() });
        drop(runtime);

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        scheduler.schedule(Duration::from_millis(20), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(200));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_many_actions_share_one_timer() {
        let fired = Arc::new(AtomicUsize::new(0));
        let scheduler = ExpiryScheduler::new();

        for _ in 0..1_000 {
            let counter = fired.clone();
            scheduler.schedule(Duration::from_millis(20), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        thread::sleep(Duration::from_millis(300));
        assert_eq!(fired.load(Ordering::SeqCst), 1_000);
    }

    #[test]
    fn test_drop_cancels_pending_actions() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let scheduler = ExpiryScheduler::new();
        scheduler.schedule(Duration::from_millis(50), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(scheduler);

        thread::sleep(Duration::from_millis(150));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
