//! SyncCoordinator: send-now-or-queue on submit, drain-and-acknowledge on
//! reconnect.
//!
//! Only one flush runs at a time. A flush requested while another is in
//! flight sets a rerun flag and returns at once; the running flush loops once
//! more before releasing the guard, so a burst of `WentOnline` events costs at
//! most one extra drain.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, Instrument};

use formsync_core::constants::MAX_BATCH_SIZE;
use formsync_core::errors::FormSyncResult;
use formsync_core::models::{
    ItemOutcome, QueuedSubmission, StoredSubmissionRecord, SubmissionPayload, SubmitRequest,
};
use formsync_core::traits::SubmissionTransport;
use formsync_observability::tracing_setup::events;
use formsync_observability::SyncMetrics;
use formsync_storage::LocalStore;

use crate::connectivity::{ConnectivityEvent, ConnectivityMonitor, ConnectivitySubscription};

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The server stored the payload.
    SubmittedOnline(StoredSubmissionRecord),
    /// The payload is in the pending queue and will go out on the next flush.
    SavedOffline,
    /// The server processed the payload and refused it. Nothing was queued.
    Rejected { reason: String },
}

/// Result of a flush request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The queue was empty; no request was made.
    Empty,
    /// The server answered every item. Refused items were dead-lettered.
    Flushed { accepted: usize, rejected: usize },
    /// The send failed; every entry is still queued.
    Failed { pending: usize },
    /// Another flush was in flight; it will run once more when done.
    Coalesced,
    /// The monitor reports offline; nothing was attempted.
    Offline,
}

/// Clears the in-flight flag on every exit path, including cancellation.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SyncCoordinator<T: SubmissionTransport> {
    store: Arc<LocalStore>,
    transport: Arc<T>,
    monitor: ConnectivityMonitor,
    metrics: Arc<SyncMetrics>,
    batch_limit: usize,
    in_flight: AtomicBool,
    rerun_requested: AtomicBool,
}

impl<T: SubmissionTransport> SyncCoordinator<T> {
    pub fn new(store: Arc<LocalStore>, transport: Arc<T>, monitor: ConnectivityMonitor) -> Self {
        Self {
            store,
            transport,
            monitor,
            metrics: Arc::new(SyncMetrics::new()),
            batch_limit: MAX_BATCH_SIZE,
            in_flight: AtomicBool::new(false),
            rerun_requested: AtomicBool::new(false),
        }
    }

    /// Share an existing metrics registry.
    pub fn with_metrics(mut self, metrics: Arc<SyncMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Largest batch sent in one request. Longer queues go out in chunks.
    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit.max(1);
        self
    }

    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    pub fn metrics(&self) -> &Arc<SyncMetrics> {
        &self.metrics
    }

    pub fn is_flushing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Send now when online, otherwise queue.
    ///
    /// A failed send is queued, never surfaced. Only a storage fault while
    /// queueing comes back as an error.
    pub async fn submit(&self, payload: SubmissionPayload) -> FormSyncResult<SubmitOutcome> {
        if self.monitor.is_online() {
            match self.transport.submit(SubmitRequest::single(&payload)).await {
                Ok(response) => match response.into_outcomes().into_iter().next() {
                    Some(ItemOutcome::Accepted { record }) => {
                        events::submission_sent(payload.form_id.0, record.id);
                        self.metrics.record_submitted_online();
                        return Ok(SubmitOutcome::SubmittedOnline(record));
                    }
                    Some(refused) => {
                        let reason = refused.rejection_reason().unwrap_or_default();
                        events::submission_rejected(payload.form_id.0, &reason);
                        self.metrics.record_rejected(1);
                        return Ok(SubmitOutcome::Rejected { reason });
                    }
                    None => debug!("empty response to single submit, queueing"),
                },
                Err(e) => debug!(error = %e, "direct send failed, queueing"),
            }
        }
        self.save_offline(&payload).await
    }

    async fn save_offline(&self, payload: &SubmissionPayload) -> FormSyncResult<SubmitOutcome> {
        if self.store.enqueue(payload).await? {
            self.metrics.record_queued();
        }
        let pending = self.store.pending_count().await?;
        events::submission_queued(payload.form_id.0, pending);
        Ok(SubmitOutcome::SavedOffline)
    }

    /// Drain the queue against the server.
    ///
    /// Entries are removed only after the server answered for them; a
    /// transport failure leaves the queue exactly as it was.
    pub async fn flush(&self) -> FormSyncResult<FlushOutcome> {
        if !self.try_begin() {
            self.rerun_requested.store(true, Ordering::SeqCst);
            events::flush_coalesced();
            self.metrics.record_coalesced();
            return Ok(FlushOutcome::Coalesced);
        }

        loop {
            let guard = InFlightGuard(&self.in_flight);
            let result = self.flush_until_settled().await;
            drop(guard);
            let outcome = result?;

            // A request may have landed between the last pass and the release.
            if !self.rerun_requested.load(Ordering::SeqCst) || !self.try_begin() {
                return Ok(outcome);
            }
        }
    }

    /// Flush when the app starts, if online.
    pub async fn flush_on_launch(&self) -> FormSyncResult<FlushOutcome> {
        if !self.monitor.is_online() {
            return Ok(FlushOutcome::Offline);
        }
        self.flush().await
    }

    /// Flush on every `WentOnline` until the subscription closes.
    ///
    /// Transitions that arrive while a flush is running are collapsed into a
    /// single follow-up flush.
    pub async fn run(&self, mut subscription: ConnectivitySubscription) {
        while let Some(event) = subscription.recv().await {
            if event != ConnectivityEvent::WentOnline {
                continue;
            }
            loop {
                if let Err(e) = self.flush().await {
                    error!(error = %e, "flush after reconnect failed");
                }
                if !drain_went_online(&mut subscription) {
                    break;
                }
                events::flush_coalesced();
                self.metrics.record_coalesced();
            }
        }
    }

    fn try_begin(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    async fn flush_until_settled(&self) -> FormSyncResult<FlushOutcome> {
        loop {
            self.rerun_requested.store(false, Ordering::SeqCst);
            let outcome = self.flush_once().await?;
            if !self.rerun_requested.load(Ordering::SeqCst) {
                return Ok(outcome);
            }
        }
    }

    async fn flush_once(&self) -> FormSyncResult<FlushOutcome> {
        let queued = self.store.drain_all().await?;
        if queued.is_empty() {
            return Ok(FlushOutcome::Empty);
        }

        let span = formsync_observability::flush_span!(queued.len());
        self.send_all(&queued).instrument(span).await
    }

    /// Send every chunk, then acknowledge once through the last `seq`.
    ///
    /// A failed chunk leaves the whole queue in place, including chunks the
    /// server already applied; replaying them is an idempotent upsert.
    async fn send_all(&self, queued: &[QueuedSubmission]) -> FormSyncResult<FlushOutcome> {
        let Some(through) = queued.last().map(|q| q.seq) else {
            return Ok(FlushOutcome::Empty);
        };

        let mut rejections = Vec::new();
        for chunk in queued.chunks(self.batch_limit) {
            match self.send_chunk(chunk).await {
                Some(refused) => rejections.extend(refused),
                None => {
                    self.metrics.record_flush_failure();
                    let pending = self.store.pending_count().await?;
                    return Ok(FlushOutcome::Failed { pending });
                }
            }
        }

        self.store.acknowledge(through, &rejections).await?;
        let rejected = rejections.len();
        let accepted = queued.len() - rejected;
        self.metrics.record_flush(accepted as u64);
        self.metrics.record_rejected(rejected as u64);
        events::flush_completed(accepted, rejected);
        Ok(FlushOutcome::Flushed { accepted, rejected })
    }

    /// Send one chunk. Returns the refused items with their reasons, or
    /// `None` when the send failed.
    async fn send_chunk(&self, chunk: &[QueuedSubmission]) -> Option<Vec<(SubmissionPayload, String)>> {
        let payloads: Vec<SubmissionPayload> = chunk.iter().map(|q| q.payload.clone()).collect();
        events::flush_started(payloads.len());

        let outcomes = match self.transport.submit(SubmitRequest::batch(&payloads)).await {
            Ok(response) => response.into_outcomes(),
            Err(e) => {
                events::flush_failed(payloads.len(), &e.to_string());
                return None;
            }
        };
        if outcomes.len() != payloads.len() {
            let reason = format!("{} outcomes for {} items", outcomes.len(), payloads.len());
            events::flush_failed(payloads.len(), &reason);
            return None;
        }

        Some(
            payloads
                .into_iter()
                .zip(&outcomes)
                .filter_map(|(payload, outcome)| {
                    outcome.rejection_reason().map(|reason| {
                        events::submission_rejected(payload.form_id.0, &reason);
                        (payload, reason)
                    })
                })
                .collect(),
        )
    }
}

/// Empty the subscription's backlog; true if it held a `WentOnline`.
fn drain_went_online(subscription: &mut ConnectivitySubscription) -> bool {
    let mut went_online = false;
    while let Some(event) = subscription.try_recv() {
        went_online |= event == ConnectivityEvent::WentOnline;
    }
    went_online
}

impl<T: SubmissionTransport + 'static> SyncCoordinator<T> {
    /// Spawn [`run`](Self::run) on the current runtime. Abort the handle to stop.
    pub fn spawn_driver(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let coordinator = Arc::clone(self);
        let subscription = coordinator.monitor.subscribe();
        tokio::spawn(async move { coordinator.run(subscription).await })
    }
}
