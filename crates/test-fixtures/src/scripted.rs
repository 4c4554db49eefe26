//! In-process transport with programmable failures, for driving the sync
//! coordinator and catalog without a server.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tokio::sync::{Notify, Semaphore};

use formsync_core::errors::{FormSyncError, FormSyncResult, TransportError};
use formsync_core::models::{
    FieldValues, FormDefinition, FormId, FormSummary, ItemOutcome, RawPayload,
    StoredSubmissionRecord, SubmissionStatus, SubmitRequest, SubmitResponse, UserId,
};
use formsync_core::traits::SubmissionTransport;

const OPEN_GATE_PERMITS: usize = 1024;

/// Records every call and answers from an in-memory script.
///
/// By default every item is accepted. Use [`fail_always`](Self::fail_always)
/// or [`fail_next`](Self::fail_next) to simulate an unreachable server,
/// [`mark_unknown`](Self::mark_unknown) to refuse a form id, and
/// [`hold`](Self::hold) / [`release`](Self::release) to keep a submit in
/// flight until the test lets it finish.
pub struct ScriptedTransport {
    forms: Mutex<Vec<FormDefinition>>,
    records: Mutex<Vec<StoredSubmissionRecord>>,
    unknown_forms: Mutex<HashSet<FormId>>,
    requests: Mutex<Vec<SubmitRequest>>,
    fail_all: AtomicBool,
    fail_next: AtomicUsize,
    /// Submits still allowed to succeed before every later one fails.
    fail_after: Mutex<Option<usize>>,
    submit_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    next_id: AtomicI64,
    gated: AtomicBool,
    gate: Semaphore,
    entered: Notify,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::with_forms(Vec::new())
    }

    pub fn with_forms(forms: Vec<FormDefinition>) -> Self {
        Self {
            forms: Mutex::new(forms),
            records: Mutex::new(Vec::new()),
            unknown_forms: Mutex::new(HashSet::new()),
            requests: Mutex::new(Vec::new()),
            fail_all: AtomicBool::new(false),
            fail_next: AtomicUsize::new(0),
            fail_after: Mutex::new(None),
            submit_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            next_id: AtomicI64::new(0),
            gated: AtomicBool::new(false),
            gate: Semaphore::new(0),
            entered: Notify::new(),
        }
    }

    /// Every call fails as unreachable while set.
    pub fn fail_always(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    /// The next `n` submit calls fail as unreachable.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Let the next `n` submit calls through, then fail every one after.
    pub fn fail_after(&self, n: usize) {
        *lock(&self.fail_after) = Some(n);
    }

    /// Drop every scripted failure.
    pub fn clear_failures(&self) {
        self.fail_all.store(false, Ordering::SeqCst);
        self.fail_next.store(0, Ordering::SeqCst);
        *lock(&self.fail_after) = None;
    }

    /// Items for this form come back as not found.
    pub fn mark_unknown(&self, form_id: FormId) {
        lock(&self.unknown_forms).insert(form_id);
    }

    /// Replace the published forms.
    pub fn set_forms(&self, forms: Vec<FormDefinition>) {
        *lock(&self.forms) = forms;
    }

    /// Block subsequent submits until [`release`](Self::release) is called.
    pub fn hold(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    /// Let `n` held submits proceed.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Stop gating and let everything through.
    pub fn open_gate(&self) {
        self.gated.store(false, Ordering::SeqCst);
        self.gate.add_permits(OPEN_GATE_PERMITS);
    }

    /// Resolves once a gated submit has started.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Highest number of submits observed in flight at once.
    pub fn max_concurrent_submits(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Every submit request received, in order.
    pub fn requests(&self) -> Vec<SubmitRequest> {
        lock(&self.requests).clone()
    }

    /// Total items across all submit requests.
    pub fn items_sent(&self) -> usize {
        lock(&self.requests).iter().map(SubmitRequest::len).sum()
    }

    fn take_failure(&self) -> bool {
        if self.fail_all.load(Ordering::SeqCst) {
            return true;
        }
        if let Some(remaining) = lock(&self.fail_after).as_mut() {
            if *remaining == 0 {
                return true;
            }
            *remaining -= 1;
        }
        self.fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn check_reachable(&self) -> FormSyncResult<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(unreachable_err());
        }
        Ok(())
    }

    fn answer(&self, item: &RawPayload) -> ItemOutcome {
        let body = &item.0;
        let form_id = match body.get("form_id").and_then(serde_json::Value::as_i64) {
            Some(id) => FormId(id),
            None => {
                return ItemOutcome::Invalid {
                    reason: "missing form_id".to_string(),
                }
            }
        };
        if lock(&self.unknown_forms).contains(&form_id) {
            return ItemOutcome::NotFound {
                form_id: form_id.to_string(),
            };
        }
        let values: FieldValues = body
            .get("values")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();
        let client_timestamp = body
            .get("client_timestamp")
            .and_then(serde_json::Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        let now = Utc::now();

        let mut records = lock(&self.records);
        let record = match records.iter_mut().find(|r| r.form_id == form_id) {
            Some(existing) => {
                existing.values = values;
                existing.updated_at = now;
                existing.client_timestamp = client_timestamp;
                existing.clone()
            }
            None => {
                let record = StoredSubmissionRecord {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                    user_id: UserId(1),
                    form_id,
                    values,
                    status: SubmissionStatus::Submitted,
                    submitted_at: now,
                    updated_at: now,
                    client_timestamp,
                };
                records.push(record.clone());
                record
            }
        };
        ItemOutcome::Accepted { record }
    }
}

impl SubmissionTransport for ScriptedTransport {
    async fn submit(&self, request: SubmitRequest) -> FormSyncResult<SubmitResponse> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        lock(&self.requests).push(request.clone());

        if self.gated.load(Ordering::SeqCst) {
            self.entered.notify_one();
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }

        let result = if self.take_failure() {
            Err(unreachable_err())
        } else {
            Ok(match request {
                SubmitRequest::Single(item) => SubmitResponse::Single(self.answer(&item)),
                SubmitRequest::Batch(items) => {
                    SubmitResponse::Batch(items.iter().map(|item| self.answer(item)).collect())
                }
            })
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn fetch_forms(&self) -> FormSyncResult<Vec<FormSummary>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        let mut summaries: Vec<FormSummary> =
            lock(&self.forms).iter().map(FormDefinition::summary).collect();
        summaries.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(summaries)
    }

    async fn fetch_form(&self, form_id: FormId) -> FormSyncResult<FormDefinition> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        lock(&self.forms)
            .iter()
            .find(|f| f.id == form_id)
            .cloned()
            .ok_or(FormSyncError::FormNotFound { form_id })
    }

    async fn fetch_submissions(&self) -> FormSyncResult<Vec<StoredSubmissionRecord>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        let mut records = lock(&self.records).clone();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}

fn unreachable_err() -> FormSyncError {
    TransportError::Unreachable {
        reason: "scripted failure".to_string(),
    }
    .into()
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}
