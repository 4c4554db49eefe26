//! Structured log events for the sync engine.
//!
//! Each function emits a `tracing` event with an `event` field naming it.

/// A payload was written to the pending queue.
pub fn submission_queued(form_id: i64, pending: usize) {
    tracing::info!(
        event = "submission_queued",
        form_id = form_id,
        pending = pending,
        "submission saved offline"
    );
}

/// A payload was accepted by the server on the direct path.
pub fn submission_sent(form_id: i64, record_id: i64) {
    tracing::info!(
        event = "submission_sent",
        form_id = form_id,
        record_id = record_id,
        "submission accepted online"
    );
}

/// The server processed a payload but refused it.
pub fn submission_rejected(form_id: i64, reason: &str) {
    tracing::warn!(
        event = "submission_rejected",
        form_id = form_id,
        reason = %reason,
        "submission rejected"
    );
}

pub fn flush_started(batch_size: usize) {
    tracing::info!(event = "flush_started", batch_size = batch_size, "flush started");
}

pub fn flush_completed(accepted: usize, rejected: usize) {
    tracing::info!(
        event = "flush_completed",
        accepted = accepted,
        rejected = rejected,
        "flush completed"
    );
}

/// The batch send failed; the queue was left untouched.
pub fn flush_failed(batch_size: usize, error: &str) {
    tracing::warn!(
        event = "flush_failed",
        batch_size = batch_size,
        error = %error,
        "flush failed, queue kept"
    );
}

/// A flush request arrived while another was in flight.
pub fn flush_coalesced() {
    tracing::debug!(event = "flush_coalesced", "flush already in flight, rerun requested");
}

pub fn connectivity_changed(online: bool) {
    tracing::info!(event = "connectivity_changed", online = online, "connectivity changed");
}

/// The server created or updated a record.
pub fn upsert_applied(user_id: i64, form_id: i64, record_id: i64) {
    tracing::info!(
        event = "upsert_applied",
        user_id = user_id,
        form_id = form_id,
        record_id = record_id,
        "submission upserted"
    );
}

pub fn form_cache_refreshed(forms: usize) {
    tracing::info!(event = "form_cache_refreshed", forms = forms, "form cache refreshed");
}
