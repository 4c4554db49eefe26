//! Submission payloads, queue entries, and server records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{FormId, SubmissionId, UserId};

/// Field name → entered value.
pub type FieldValues = BTreeMap<String, serde_json::Value>;

/// A finalized, immutable answer to one form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub submission_id: SubmissionId,
    pub form_id: FormId,
    pub values: FieldValues,
    /// Instant the user confirmed the submission on the device.
    pub client_timestamp: DateTime<Utc>,
}

impl SubmissionPayload {
    pub fn new(form_id: FormId, values: FieldValues, client_timestamp: DateTime<Utc>) -> Self {
        Self {
            submission_id: SubmissionId::new(),
            form_id,
            values,
            client_timestamp,
        }
    }
}

/// A payload waiting in the client's durable queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedSubmission {
    /// Position in the append-only queue.
    pub seq: i64,
    pub payload: SubmissionPayload,
    pub enqueued_at: DateTime<Utc>,
}

/// A queued payload the server processed but refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedSubmission {
    pub payload: SubmissionPayload,
    pub reason: String,
    pub rejected_at: DateTime<Utc>,
}

/// Lifecycle tag of a stored submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Submitted,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown submission status: {other}")),
        }
    }
}

/// Server-side record. At most one exists per (user, form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSubmissionRecord {
    pub id: i64,
    pub user_id: UserId,
    pub form_id: FormId,
    pub values: FieldValues,
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Client timestamp of the payload that last wrote the record.
    pub client_timestamp: DateTime<Utc>,
}
