//! Prometheus metrics for the scraper process.
//!
//! Process-level metrics (scrape passes) plus every core metric, gathered in
//! one registry and exported as a node-exporter textfile after each pass.

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};

use streamdex_core::ScrapeSummary;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Scrape passes completed.
pub static SCRAPE_PASSES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("streamdex_scrape_passes_total", "Total scrape passes completed").unwrap()
});

/// Unix time of the last completed pass.
pub static LAST_PASS_TIMESTAMP: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "streamdex_last_pass_timestamp_seconds",
        "Unix time at which the last scrape pass finished",
    )
    .unwrap()
});

/// Per-outcome counts of the last pass.
pub static LAST_PASS_TORRENTS: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new(
            "streamdex_last_pass_torrents",
            "Torrents handled by the last scrape pass, by outcome",
        ),
        &["outcome"],
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(SCRAPE_PASSES_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(LAST_PASS_TIMESTAMP.clone()))
        .unwrap();
    registry
        .register(Box::new(LAST_PASS_TORRENTS.clone()))
        .unwrap();

    // Core metrics (ingestion, listing, external services, cache)
    for metric in streamdex_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Record a finished pass.
pub fn record_pass(summary: &ScrapeSummary) {
    SCRAPE_PASSES_TOTAL.inc();
    LAST_PASS_TIMESTAMP.set(unix_now());

    let counts = [
        ("discovered", summary.discovered),
        ("stored", summary.stored),
        ("stored_without_files", summary.stored_without_files),
        ("skipped", summary.skipped),
        ("failed_identity", summary.failed_identity),
        ("deferred", summary.deferred),
        ("error", summary.errors),
    ];
    for (outcome, count) in counts {
        LAST_PASS_TORRENTS
            .with_label_values(&[outcome])
            .set(count as i64);
    }
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Write the exposition to `path`, through a temporary file so a collector
/// never reads a partial file.
pub fn write_textfile(path: &Path) -> Result<()> {
    let tmp = path.with_extension("prom.tmp");
    std::fs::write(&tmp, encode_metrics())
        .with_context(|| format!("Failed to write metrics to {:?}", tmp))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move metrics into {:?}", path))?;
    Ok(())
}
