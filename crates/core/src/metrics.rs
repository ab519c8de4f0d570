//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ingestion (per-torrent outcomes, files stored, pipeline duration)
//! - File listing (strategy attempts)
//! - External services (identity, metadata, web search)
//! - Lookup cache (hits and misses)

use std::time::Instant;

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Ingestion Metrics
// =============================================================================

/// Ingest outcomes total.
pub static INGEST_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "streamdex_ingest_outcomes_total",
            "Total torrents processed by outcome",
        ),
        &["outcome"], // "stored", "stored_without_files", "skipped", "failed_identity", "deferred", "error"
    )
    .unwrap()
});

/// Canonical files written.
pub static FILES_STORED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("streamdex_files_stored_total", "Total canonical files stored").unwrap()
});

/// Per-torrent pipeline duration in seconds.
pub static INGEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "streamdex_ingest_duration_seconds",
            "Duration of processing a single torrent",
        )
        .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["outcome"],
    )
    .unwrap()
});

/// Files renumbered from series metadata.
pub static EPISODES_DECOMPOSED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "streamdex_episodes_decomposed_total",
        "Total files renumbered from series metadata (concatenated or dated)",
    )
    .unwrap()
});

// =============================================================================
// File Listing Metrics
// =============================================================================

/// Listing attempts total by strategy and status.
pub static LISTING_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "streamdex_listing_attempts_total",
            "Total file listing attempts",
        ),
        &["strategy", "status"], // status: "success", "timeout", "error"
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service request duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "streamdex_external_service_duration_seconds",
            "Duration of external service calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service", "operation"],
    )
    .unwrap()
});

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "streamdex_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Cache Metrics
// =============================================================================

/// Cache lookups total by namespace and result.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("streamdex_cache_lookups_total", "Total cache lookups"),
        &["namespace", "result"], // result: "hit", "miss"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Record the duration and status of an external call started at `started`.
pub fn observe_external_call(service: &str, operation: &str, started: Instant, success: bool) {
    EXTERNAL_SERVICE_DURATION
        .with_label_values(&[service, operation])
        .observe(started.elapsed().as_secs_f64());
    EXTERNAL_SERVICE_REQUESTS
        .with_label_values(&[service, operation, if success { "success" } else { "error" }])
        .inc();
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Ingestion
        Box::new(INGEST_OUTCOMES.clone()),
        Box::new(FILES_STORED.clone()),
        Box::new(INGEST_DURATION.clone()),
        Box::new(EPISODES_DECOMPOSED.clone()),
        // File listing
        Box::new(LISTING_ATTEMPTS.clone()),
        // External services
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
        // Cache
        Box::new(CACHE_LOOKUPS.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        INGEST_OUTCOMES.with_label_values(&["stored"]).inc();
        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect();
        assert!(names.contains(&"streamdex_ingest_outcomes_total".to_string()));
    }

    #[test]
    fn test_observe_external_call() {
        let before = EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&["test-service", "op", "error"])
            .get();
        observe_external_call("test-service", "op", Instant::now(), false);
        let after = EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&["test-service", "op", "error"])
            .get();
        assert_eq!(after, before + 1);
    }
}
