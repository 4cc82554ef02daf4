//! Benchmark Driver
//!
//! Load generator that exercises a [`Cache`] with randomized bursts of
//! commands. It only uses the public cache operations.

mod report;

pub use report::BenchReport;

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::Cache;
use crate::config::Config;

const VALUE_NAMES: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// Value stored for a numeric key: the English name of its last digit.
pub fn value_for(key: u64) -> &'static str {
    VALUE_NAMES[(key % 10) as usize]
}

// == Request ==
/// Read-side command issued by request bursts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    /// Fetch the value
    Get,
    /// Check presence
    Has,
    /// Remove the key
    Delete,
}

impl Request {
    /// Every request kind, in a fixed order
    pub const ALL: [Request; 3] = [Request::Get, Request::Has, Request::Delete];

    /// Picks a request kind uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Issues the request against the cache. Misses are ignored.
    pub fn apply(self, cache: &Cache, key: &str) {
        match self {
            Request::Get => {
                let _ = cache.get(key);
            }
            Request::Has => {
                cache.has(key);
            }
            Request::Delete => cache.delete(key),
        }
    }
}

// == Bursts ==
fn populate_burst(cache: &Cache, commands: usize, key_space: u64, ttl: Duration) {
    let mut rng = rand::thread_rng();
    for _ in 0..commands {
        let key = rng.gen_range(0..key_space);
        cache.set(key.to_string(), value_for(key), ttl);
    }
}

fn request_burst(cache: &Cache, commands: usize, key_space: u64) {
    let mut rng = rand::thread_rng();
    for _ in 0..commands {
        let key = rng.gen_range(0..key_space).to_string();
        Request::random(&mut rng).apply(cache, &key);
    }
}

// == Run ==
/// Drives the cache until `config.run_duration` has elapsed.
///
/// Every step launches `config.workers` populate bursts and as many request
/// bursts on the blocking pool, logs the cache size, then sleeps for the rest
/// of `config.pause_duration`. Once the deadline passes it waits for all
/// launched bursts and reports the final counters.
pub async fn run(cache: &Cache, config: &Config) -> anyhow::Result<BenchReport> {
    let started_at = Utc::now();
    let start = Instant::now();
    let deadline = start + config.run_duration;
    let key_space = config.key_space();
    let commands = config.commands_per_burst;
    let ttl = config.entry_ttl;

    info!(
        "Starting benchmark: workers={}, commands_per_burst={}, run={:?}, pause={:?}, ttl={:?}, policy={}",
        config.workers,
        commands,
        config.run_duration,
        config.pause_duration,
        ttl,
        cache.policy()
    );

    let mut bursts: Vec<JoinHandle<()>> = Vec::new();
    let mut step: u64 = 0;

    while Instant::now() < deadline {
        let step_start = Instant::now();
        step += 1;

        for _ in 0..config.workers {
            let populate_cache = cache.clone();
            bursts.push(tokio::task::spawn_blocking(move || {
                populate_burst(&populate_cache, commands, key_space, ttl)
            }));

            let request_cache = cache.clone();
            bursts.push(tokio::task::spawn_blocking(move || {
                request_burst(&request_cache, commands, key_space)
            }));
        }

        info!(step, size = cache.size(), "Cache size");
        tokio::time::sleep(config.pause_duration.saturating_sub(step_start.elapsed())).await;
    }

    let launched = bursts.len();
    for burst in bursts {
        burst.await.context("benchmark burst failed")?;
    }
    debug!(launched, "All bursts completed");

    Ok(BenchReport::new(
        started_at,
        cache.policy(),
        start.elapsed(),
        launched,
        cache.size(),
        cache.stats(),
    ))
}
