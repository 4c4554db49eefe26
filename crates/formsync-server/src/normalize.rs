//! Loose inbound payload → [`SubmissionPayload`].
//!
//! Accepted shapes: the form id under `form_id` or `form` (number or numeric
//! string), the answers under `values` or `data` (must be an object), the
//! client time under `client_timestamp`, `timestamp` or `submitted_at`
//! (RFC 3339, defaults to receipt time), and an optional `submission_id`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use formsync_core::errors::ValidationError;
use formsync_core::models::{FieldValues, FormId, RawPayload, SubmissionId, SubmissionPayload};

const FORM_KEYS: [&str; 2] = ["form_id", "form"];
const VALUE_KEYS: [&str; 2] = ["values", "data"];
const TIMESTAMP_KEYS: [&str; 3] = ["client_timestamp", "timestamp", "submitted_at"];

pub fn normalize(raw: &RawPayload, received_at: DateTime<Utc>) -> Result<SubmissionPayload, ValidationError> {
    let body = match &raw.0 {
        Value::Object(map) => map,
        other => {
            return Err(ValidationError::NotAnObject {
                found: kind(other).to_string(),
            })
        }
    };

    Ok(SubmissionPayload {
        form_id: form_id(body)?,
        values: values(body)?,
        client_timestamp: timestamp(body)?.unwrap_or(received_at),
        submission_id: submission_id(body)?,
    })
}

fn first<'a>(body: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| body.get(*k)).filter(|v| !v.is_null())
}

fn form_id(body: &Map<String, Value>) -> Result<FormId, ValidationError> {
    match first(body, &FORM_KEYS) {
        None => Err(ValidationError::MissingFormId),
        Some(Value::Number(n)) => n.as_i64().map(FormId).ok_or_else(|| ValidationError::InvalidFormId {
            raw: n.to_string(),
        }),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(FormId)
            .map_err(|_| ValidationError::InvalidFormId { raw: s.clone() }),
        Some(other) => Err(ValidationError::InvalidFormId {
            raw: other.to_string(),
        }),
    }
}

fn values(body: &Map<String, Value>) -> Result<FieldValues, ValidationError> {
    match first(body, &VALUE_KEYS) {
        Some(Value::Object(map)) => Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
        Some(other) => Err(ValidationError::ValuesNotObject {
            found: kind(other).to_string(),
        }),
        None => Err(ValidationError::ValuesNotObject {
            found: "nothing".to_string(),
        }),
    }
}

fn timestamp(body: &Map<String, Value>) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match first(body, &TIMESTAMP_KEYS) {
        None => Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|_| ValidationError::InvalidTimestamp { raw: s.clone() }),
        Some(other) => Err(ValidationError::InvalidTimestamp {
            raw: other.to_string(),
        }),
    }
}

fn submission_id(body: &Map<String, Value>) -> Result<SubmissionId, ValidationError> {
    match body.get("submission_id") {
        None | Some(Value::Null) => Ok(SubmissionId::new()),
        Some(Value::String(s)) => Uuid::parse_str(s)
            .map(SubmissionId)
            .map_err(|_| ValidationError::InvalidSubmissionId { raw: s.clone() }),
        Some(other) => Err(ValidationError::InvalidSubmissionId {
            raw: other.to_string(),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
