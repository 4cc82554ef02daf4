//! Configuration Module
//!
//! Handles loading the cache and benchmark settings from environment variables.

use std::env;
use std::time::Duration;

use crate::tasks::ExpiryPolicy;

/// Cache and benchmark configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// The engine only reads `expiry_policy`; the remaining fields drive the benchmark.
#[derive(Debug, Clone)]
pub struct Config {
    /// How overlapping removal actions for the same key are resolved
    pub expiry_policy: ExpiryPolicy,
    /// Number of concurrent bursts launched per step, for each workload kind
    pub workers: usize,
    /// Number of commands issued by a single burst
    pub commands_per_burst: usize,
    /// Total wall-clock time during which new bursts are launched
    pub run_duration: Duration,
    /// Length of one step; the runner sleeps for whatever is left of it
    pub pause_duration: Duration,
    /// TTL applied to every entry the benchmark inserts
    pub entry_ttl: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `EXPIRY_POLICY` - `earliest` or `latest` (default: earliest)
    /// - `BENCH_WORKERS` - Bursts per step (default: 10)
    /// - `BENCH_COMMANDS` - Commands per burst (default: 100000)
    /// - `BENCH_RUN_SECS` - Run duration in seconds (default: 60)
    /// - `BENCH_PAUSE_MS` - Step length in milliseconds (default: 1000)
    /// - `BENCH_TTL_MS` - Entry TTL in milliseconds (default: 5000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            expiry_policy: parse_var("EXPIRY_POLICY").unwrap_or(defaults.expiry_policy),
            workers: parse_var("BENCH_WORKERS").unwrap_or(defaults.workers),
            commands_per_burst: parse_var("BENCH_COMMANDS")
                .unwrap_or(defaults.commands_per_burst),
            run_duration: parse_var("BENCH_RUN_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.run_duration),
            pause_duration: parse_var("BENCH_PAUSE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.pause_duration),
            entry_ttl: parse_var("BENCH_TTL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.entry_ttl),
        }
    }

    /// Exclusive upper bound of the random key space.
    pub fn key_space(&self) -> u64 {
        (self.workers as u64)
            .saturating_mul(self.commands_per_burst as u64)
            .saturating_mul(10)
            .max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expiry_policy: ExpiryPolicy::EarliestWins,
            workers: 10,
            commands_per_burst: 100_000,
            run_duration: Duration::from_secs(60),
            pause_duration: Duration::from_secs(1),
            entry_ttl: Duration::from_secs(5),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.expiry_policy, ExpiryPolicy::EarliestWins);
        assert_eq!(config.workers, 10);
        assert_eq!(config.commands_per_burst, 100_000);
        assert_eq!(config.run_duration, Duration::from_secs(60));
        assert_eq!(config.pause_duration, Duration::from_secs(1));
        assert_eq!(config.entry_ttl, Duration::from_secs(5));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("EXPIRY_POLICY");
        env::remove_var("BENCH_WORKERS");
        env::remove_var("BENCH_COMMANDS");
        env::remove_var("BENCH_RUN_SECS");
        env::remove_var("BENCH_PAUSE_MS");
        env::remove_var("BENCH_TTL_MS");

        let config = Config::from_env();
        assert_eq!(config.expiry_policy, ExpiryPolicy::EarliestWins);
        assert_eq!(config.workers, 10);
        assert_eq!(config.commands_per_burst, 100_000);
        assert_eq!(config.entry_ttl, Duration::from_secs(5));
    }

    #[test]
    fn test_key_space() {
        let config = Config {
            workers: 2,
            commands_per_burst: 50,
            ..Config::default()
        };
        assert_eq!(config.key_space(), 1000);

        let empty = Config {
            workers: 0,
            ..Config::default()
        };
        assert_eq!(empty.key_space(), 1);
    }
}
