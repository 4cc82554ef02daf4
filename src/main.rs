//! TTL Cache benchmark
//!
//! Runs the load generator against a fresh cache and prints the final counters.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::{bench, Cache, Config};

/// Main entry point for the cache benchmark.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache with the configured expiry policy
/// 4. Run the benchmark until the configured duration has elapsed
/// 5. Print the report
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: policy={}, workers={}, commands_per_burst={}, run={:?}",
        config.expiry_policy, config.workers, config.commands_per_burst, config.run_duration
    );

    let cache = Cache::from_config(&config);
    let report = bench::run(&cache, &config).await?;

    info!("{}", report.summary());
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
