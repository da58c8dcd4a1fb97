//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Record source fetches (popular listing, site search)
//! - The in-memory popular snapshot
//! - Memorize attempts

use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, IntGauge, Opts};

use crate::book::Book;
use crate::source::SourceError;

// =============================================================================
// Record source
// =============================================================================

/// Remote fetches by kind and outcome.
pub static SOURCE_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelf_source_fetches_total", "Total remote listing fetches"),
        &["kind", "outcome"], // kind: "popular" | "search"; outcome: "ok" | "error"
    )
    .unwrap()
});

// =============================================================================
// Popular cache
// =============================================================================

/// Number of entries in the current popular snapshot.
pub static POPULAR_SNAPSHOT_SIZE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "shelf_popular_snapshot_size",
        "Number of books in the cached popular snapshot",
    )
    .unwrap()
});

// =============================================================================
// Memorized store
// =============================================================================

/// Memorize attempts by result.
pub static MEMORIZE_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelf_memorize_attempts_total", "Total memorize attempts"),
        &["result"], // "stored", "duplicate", "invalid", "unavailable"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Record the outcome of a remote fetch.
pub fn record_fetch(kind: &str, result: &Result<Vec<Book>, SourceError>) {
    let outcome = if result.is_ok() { "ok" } else { "error" };
    SOURCE_FETCHES.with_label_values(&[kind, outcome]).inc();
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SOURCE_FETCHES.clone()),
        Box::new(POPULAR_SNAPSHOT_SIZE.clone()),
        Box::new(MEMORIZE_ATTEMPTS.clone()),
    ]
}
