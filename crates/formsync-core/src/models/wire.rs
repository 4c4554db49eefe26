//! Request/response shapes of the submit endpoint.
//!
//! Inbound payloads are accepted loosely (a single object or an array, `form`
//! or `form_id`, `values` or `data`) and normalized by the server before they
//! reach the upsert logic. Outcomes are positional: outcome `i` answers item `i`.

use serde::{Deserialize, Serialize};

use super::submission::{StoredSubmissionRecord, SubmissionPayload};

/// One inbound payload before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPayload(pub serde_json::Value);

impl From<&SubmissionPayload> for RawPayload {
    fn from(payload: &SubmissionPayload) -> Self {
        Self(serde_json::json!({
            "submission_id": payload.submission_id,
            "form_id": payload.form_id,
            "values": payload.values,
            "client_timestamp": payload.client_timestamp.to_rfc3339(),
        }))
    }
}

/// Body of a submit call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmitRequest {
    Batch(Vec<RawPayload>),
    Single(RawPayload),
}

impl SubmitRequest {
    pub fn single(payload: &SubmissionPayload) -> Self {
        Self::Single(payload.into())
    }

    pub fn batch(payloads: &[SubmissionPayload]) -> Self {
        Self::Batch(payloads.iter().map(RawPayload::from).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-item result of a submit call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// The record as persisted after the upsert.
    Accepted { record: StoredSubmissionRecord },
    /// The referenced form does not exist (or the id does not parse).
    NotFound { form_id: String },
    /// The payload shape was malformed.
    Invalid { reason: String },
}

impl ItemOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn record(&self) -> Option<&StoredSubmissionRecord> {
        match self {
            Self::Accepted { record } => Some(record),
            _ => None,
        }
    }

    /// Human-readable reason for a refused item.
    pub fn rejection_reason(&self) -> Option<String> {
        match self {
            Self::Accepted { .. } => None,
            Self::NotFound { form_id } => Some(format!("form not found: {form_id}")),
            Self::Invalid { reason } => Some(reason.clone()),
        }
    }
}

/// Response body mirroring the request shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmitResponse {
    Batch(Vec<ItemOutcome>),
    Single(ItemOutcome),
}

impl SubmitResponse {
    pub fn into_outcomes(self) -> Vec<ItemOutcome> {
        match self {
            Self::Single(outcome) => vec![outcome],
            Self::Batch(outcomes) => outcomes,
        }
    }
}
