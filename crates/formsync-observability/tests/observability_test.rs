//! Tracing setup, span macros, and sync counters.

use std::sync::Arc;

use formsync_core::config::ObservabilityConfig;
use formsync_observability::tracing_setup::{events, spans};
use formsync_observability::{init_from_config, init_tracing_with_filter, SyncMetrics};

#[test]
fn second_init_is_reported_not_panicking() {
    let _ = init_tracing_with_filter("debug");
    assert!(!init_tracing_with_filter("debug"));
    assert!(!init_from_config(&ObservabilityConfig::default()));
}

#[test]
fn events_and_spans_emit_without_subscriber_errors() {
    let _ = init_tracing_with_filter("trace");
    let span = formsync_observability::flush_span!(3usize);
    let _guard = span.enter();
    events::flush_started(3);
    events::submission_queued(7, 1);
    events::flush_completed(2, 1);
    let _upsert = formsync_observability::upsert_span!(7, 2usize);
    let _fill = formsync_observability::fill_span!(3);
    assert_eq!(spans::names::FLUSH, "formsync.flush");
}

#[test]
fn metrics_count_across_threads() {
    let metrics = Arc::new(SyncMetrics::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let m = Arc::clone(&metrics);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    m.record_queued();
                }
                m.record_flush(10);
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let snap = metrics.snapshot();
    assert_eq!(snap.queued, 400);
    assert_eq!(snap.flushes, 4);
    assert_eq!(snap.flushed_items, 40);
}

#[test]
fn snapshot_serializes_and_reset_clears() {
    let metrics = SyncMetrics::new();
    metrics.record_coalesced();
    metrics.record_rejected(2);

    let json = serde_json::to_value(metrics.snapshot()).unwrap();
    assert_eq!(json["coalesced"], 1);
    assert_eq!(json["rejected"], 2);

    metrics.reset();
    assert_eq!(metrics.snapshot(), Default::default());
}
