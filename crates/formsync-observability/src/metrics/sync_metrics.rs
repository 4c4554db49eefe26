use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters updated from concurrent tasks without locking.
#[derive(Debug, Default)]
pub struct SyncMetrics {
    submitted_online: AtomicU64,
    queued: AtomicU64,
    rejected: AtomicU64,
    flushes: AtomicU64,
    flushed_items: AtomicU64,
    flush_failures: AtomicU64,
    coalesced: AtomicU64,
}

/// Point-in-time copy of [`SyncMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMetricsSnapshot {
    pub submitted_online: u64,
    pub queued: u64,
    pub rejected: u64,
    pub flushes: u64,
    pub flushed_items: u64,
    pub flush_failures: u64,
    pub coalesced: u64,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submitted_online(&self) {
        self.submitted_online.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self, count: u64) {
        self.rejected.fetch_add(count, Ordering::Relaxed);
    }

    /// A flush that reached the server and was acknowledged.
    pub fn record_flush(&self, items: u64) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.flushed_items.fetch_add(items, Ordering::Relaxed);
    }

    pub fn record_flush_failure(&self) {
        self.flush_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SyncMetricsSnapshot {
        SyncMetricsSnapshot {
            submitted_online: self.submitted_online.load(Ordering::Relaxed),
            queued: self.queued.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            flushed_items: self.flushed_items.load(Ordering::Relaxed),
            flush_failures: self.flush_failures.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters (useful for testing or periodic rotation).
    pub fn reset(&self) {
        for counter in [
            &self.submitted_online,
            &self.queued,
            &self.rejected,
            &self.flushes,
            &self.flushed_items,
            &self.flush_failures,
            &self.coalesced,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
