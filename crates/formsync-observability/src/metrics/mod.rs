//! Sync counters shared between the coordinator and whoever reports on it.

mod sync_metrics;

pub use sync_metrics::{SyncMetrics, SyncMetricsSnapshot};
