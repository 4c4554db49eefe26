//! # formsync-observability
//!
//! Structured tracing for the sync engine: subscriber setup driven by
//! `FORMSYNC_LOG`, one log event per domain occurrence, span macros for the
//! flush/upsert/fill operations, and lock-free sync counters.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{SyncMetrics, SyncMetricsSnapshot};
pub use tracing_setup::{init_from_config, init_tracing, init_tracing_with_filter};
