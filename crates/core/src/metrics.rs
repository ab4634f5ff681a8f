//! Prometheus metrics for a pipeline run.
//!
//! A run is a short-lived process, so metrics are not scraped. The binary
//! dumps [`gather_text`] to a file picked up by a textfile collector.

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

// =============================================================================
// Scrape
// =============================================================================

/// Sources scraped by type and result.
pub static SCRAPE_SOURCES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "pressroom_scrape_sources_total",
            "Total sources scraped",
        ),
        &["source_type", "result"], // result: "success", "failed"
    )
    .unwrap()
});

/// Items returned by scrapers.
pub static SCRAPED_ITEMS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pressroom_scraped_items_total", "Total content items scraped"),
        &["source_type"],
    )
    .unwrap()
});

// =============================================================================
// Rank / enrich
// =============================================================================

/// Rank stage attempts by result.
pub static RANK_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pressroom_rank_total", "Total rank stage attempts"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Items enriched by result.
pub static ENRICHMENT_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pressroom_enrichment_total", "Total items enriched"),
        &["result"], // "success", "fallback"
    )
    .unwrap()
});

// =============================================================================
// Run
// =============================================================================

/// Stage duration in seconds.
pub static STAGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pressroom_stage_duration_seconds",
            "Duration of each pipeline stage",
        )
        .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
        &["stage"],
    )
    .unwrap()
});

/// Finished runs by outcome.
pub static RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pressroom_runs_total", "Total pipeline runs"),
        &["outcome"], // "published", "partial", "no_content", "failed"
    )
    .unwrap()
});

/// Registry holding every pipeline metric.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    for collector in all_metrics() {
        // Registration only fails on duplicate names, which are static here.
        let _ = registry.register(collector);
    }
    registry
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SCRAPE_SOURCES.clone()),
        Box::new(SCRAPED_ITEMS.clone()),
        Box::new(RANK_TOTAL.clone()),
        Box::new(ENRICHMENT_TOTAL.clone()),
        Box::new(STAGE_DURATION.clone()),
        Box::new(RUNS_TOTAL.clone()),
    ]
}

/// Render every metric in the Prometheus text format.
pub fn gather_text() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_text_contains_counters() {
        RUNS_TOTAL.with_label_values(&["published"]).inc();
        let text = gather_text().unwrap();
        assert!(text.contains("pressroom_runs_total"));
    }
}
