//! SQL for every table. Functions take a `&Connection` and are called inside
//! the engines' scoped connection closures.

pub mod form_cache;
pub mod pending_queue;
pub mod rejected;
pub mod server_forms;
pub mod server_submissions;

use chrono::{DateTime, SecondsFormat, Utc};

use formsync_core::errors::{FormSyncError, StorageError};
use formsync_core::models::FieldValues;

/// Fixed-width UTC timestamps so text ordering matches time ordering.
pub(crate) fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(table: &str, raw: &str) -> Result<DateTime<Utc>, FormSyncError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| corrupt(table, format!("bad timestamp '{raw}': {e}")))
}

pub(crate) fn parse_values(table: &str, raw: &str) -> Result<FieldValues, FormSyncError> {
    serde_json::from_str(raw).map_err(|e| corrupt(table, format!("bad field values: {e}")))
}

pub(crate) fn corrupt(table: &str, details: String) -> FormSyncError {
    StorageError::CorruptRow {
        table: table.to_string(),
        details,
    }
    .into()
}
