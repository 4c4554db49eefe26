use std::future::Future;

use crate::errors::FormSyncResult;
use crate::models::{
    FormDefinition, FormId, FormSummary, StoredSubmissionRecord, SubmitRequest, SubmitResponse,
};

/// Client-side view of the form server.
///
/// Any network-level failure must come back as `FormSyncError::TransportError`
/// so the sync coordinator can route the payload to the offline queue. A
/// response that arrived (even one with refused items) is not a transport failure.
pub trait SubmissionTransport: Send + Sync {
    /// POST one payload or a batch; outcomes are positional.
    fn submit(
        &self,
        request: SubmitRequest,
    ) -> impl Future<Output = FormSyncResult<SubmitResponse>> + Send;

    /// Forms visible to the session user, ordered by title.
    fn fetch_forms(&self) -> impl Future<Output = FormSyncResult<Vec<FormSummary>>> + Send;

    /// Full structure of one form.
    fn fetch_form(
        &self,
        form_id: FormId,
    ) -> impl Future<Output = FormSyncResult<FormDefinition>> + Send;

    /// The session user's stored submissions, newest first.
    fn fetch_submissions(
        &self,
    ) -> impl Future<Output = FormSyncResult<Vec<StoredSubmissionRecord>>> + Send;
}
