mod metrics;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use streamdex_core::{
    load_config, validate_config, CacheBackend, CacheStore, CatalogStore, Config, EntryBuilder,
    FeedProvider, FileListingResolver, IdentityResolver, MemoryCache, MetadataFetcher, Provider,
    ScrapeRunner, SqliteCache, SqliteCatalog,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        // config errors happen before the subscriber exists
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Determine config path
    let config_path = std::env::var("STREAMDEX_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    init_logging(&config);
    info!("Configuration loaded from {:?}", config_path);
    info!("Database path: {:?}", config.database.path);

    let catalog: Arc<dyn CatalogStore> = Arc::new(
        SqliteCatalog::new(&config.database.path).context("Failed to open catalog")?,
    );
    info!("Catalog initialized");

    let cache = create_cache(&config);
    let ttl = Duration::from_secs(config.cache.ttl_secs);
    let files_ttl = Duration::from_secs(config.cache.files_ttl_secs);

    let files = Arc::new(FileListingResolver::from_config(
        &config.files,
        cache.clone(),
        files_ttl,
    ));
    let identity = Arc::new(
        IdentityResolver::from_config(&config.identity, cache.clone(), ttl)
            .context("Failed to create identity resolver")?,
    );
    let metadata = Arc::new(
        MetadataFetcher::from_config(&config.metadata, cache.clone(), ttl)
            .context("Failed to create metadata fetcher")?,
    );
    let builder = Arc::new(EntryBuilder::new(catalog, files, identity, metadata));
    let runner = ScrapeRunner::new(builder, config.scraper.max_concurrent);

    let providers: Vec<Arc<dyn Provider>> = config
        .scraper
        .feeds
        .iter()
        .map(|feed| {
            info!("Feed provider '{}' reading {:?}", feed.name, feed.path);
            Arc::new(FeedProvider::new(feed.name.clone(), feed.path.clone())) as Arc<dyn Provider>
        })
        .collect();
    if providers.is_empty() {
        warn!("No feeds configured, nothing to scrape");
    }

    match config.scraper.interval_secs {
        None => {
            scrape_pass(&runner, &providers, cache.as_ref(), &config).await;
        }
        Some(secs) => {
            info!("Scraping every {}s", secs);
            let mut ticker = tokio::time::interval(Duration::from_secs(secs));
            loop {
                tokio::select! {
                    _ = ticker.tick() => scrape_pass(&runner, &providers, cache.as_ref(), &config).await,
                    _ = shutdown_signal() => {
                        info!("Shutdown requested");
                        break;
                    }
                }
            }
        }
    }

    info!("Scraper stopped");
    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Configured cache, degrading to an in-process cache when the SQLite file
/// cannot be opened.
fn create_cache(config: &Config) -> Arc<dyn CacheStore> {
    match config.cache.backend {
        CacheBackend::Memory => {
            info!("Using in-memory lookup cache");
            Arc::new(MemoryCache::new())
        }
        CacheBackend::Sqlite => match SqliteCache::new(&config.cache.path) {
            Ok(cache) => {
                info!("Using SQLite lookup cache at {:?}", config.cache.path);
                Arc::new(cache)
            }
            Err(e) => {
                warn!(
                    "Failed to open cache at {:?}, falling back to memory: {}",
                    config.cache.path, e
                );
                Arc::new(MemoryCache::new())
            }
        },
    }
}

async fn scrape_pass(
    runner: &ScrapeRunner,
    providers: &[Arc<dyn Provider>],
    cache: &dyn CacheStore,
    config: &Config,
) {
    let summary = runner.run(providers).await;
    info!(
        discovered = summary.discovered,
        stored = summary.stored,
        stored_without_files = summary.stored_without_files,
        skipped = summary.skipped,
        failed_identity = summary.failed_identity,
        deferred = summary.deferred,
        errors = summary.errors,
        "Scrape pass finished"
    );

    match cache.purge_expired().await {
        Ok(0) => {}
        Ok(purged) => info!(purged = purged, "Purged expired cache entries"),
        Err(e) => warn!("Failed to purge cache: {}", e),
    }

    metrics::record_pass(&summary);
    if let Some(ref path) = config.metrics.textfile_path {
        if let Err(e) = metrics::write_textfile(path) {
            warn!("Failed to export metrics: {:#}", e);
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
