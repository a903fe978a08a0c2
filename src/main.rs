//! Small helper binary that runs one cache-region operation against the
//! configured store, for poking at a region from the shell.
//!
//! Usage: `region-cache <namespace> <get|put|remove|clear|size> [key] [value]`.
//! The store is chosen with `REGION_CACHE_STORE` (`redis` or `memory`), Redis
//! is found at `REGION_CACHE_REDIS_URL`, and `REGION_CACHE_TIMEOUT_MS` sets
//! the namespace TTL applied on writes.

use std::sync::Arc;

use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use region_cache::config::{Command, Config, StoreConfig};
use region_cache::{
    HashStore, MemoryStore, Metrics, RedisStore, RegionCache, StoreLocator, StoreRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    info!("{:?}", &config);

    let store: Arc<dyn HashStore> = match &config.store_config {
        StoreConfig::Memory => Arc::new(MemoryStore::new()),
        StoreConfig::Redis(redis) => Arc::new(RedisStore::connect(redis).await?),
    };
    let registry = Arc::new(StoreRegistry::new());
    registry.install(store)?;

    let metrics = Arc::new(Metrics::default());
    let cache: RegionCache<String> =
        RegionCache::new(config.namespace.clone(), StoreLocator::new(registry))?
            .with_timeout(config.timeout)
            .with_metrics(metrics.clone());

    run(&cache, config.command).await;

    info!("{:?}", metrics);
    Ok(())
}

#[tracing::instrument(skip_all, fields(region = %cache))]
async fn run(cache: &RegionCache<String>, command: Command) {
    match command {
        Command::Get { key } => match cache.get(&key).await {
            Some(value) => println!("{}", value),
            None => println!("(nil)"),
        },
        Command::Put { key, value } => cache.put(&key, &value).await,
        Command::Remove { key } => match cache.remove(&key).await {
            Some(value) => println!("{}", value),
            None => println!("(nil)"),
        },
        Command::Clear => cache.clear().await,
        Command::Size => println!("{}", cache.size().await),
    }
}
