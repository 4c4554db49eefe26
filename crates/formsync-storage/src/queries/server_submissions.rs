//! Submission records on the server, unique per (user, form).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use formsync_core::errors::FormSyncResult;
use formsync_core::models::{
    FormId, StoredSubmissionRecord, SubmissionPayload, SubmissionStatus, UserId,
};

use super::{corrupt, fmt_ts, parse_ts, parse_values};
use crate::to_storage_err;

const TABLE: &str = "submissions";

const COLUMNS: &str =
    "id, user_id, form_id, field_values, status, submitted_at, updated_at, client_timestamp";

/// Create-or-update keyed on (user, form) in one statement.
///
/// New rows start as `submitted`. Existing rows get the new values and
/// timestamps; status and `submitted_at` are kept.
pub fn upsert(
    conn: &Connection,
    user_id: UserId,
    payload: &SubmissionPayload,
    now: DateTime<Utc>,
) -> FormSyncResult<StoredSubmissionRecord> {
    let values = serde_json::to_string(&payload.values)?;
    let sql = format!(
        "INSERT INTO submissions
             (user_id, form_id, field_values, status, submitted_at, updated_at, client_timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6)
         ON CONFLICT(user_id, form_id) DO UPDATE SET
             field_values = excluded.field_values,
             updated_at = excluded.updated_at,
             client_timestamp = excluded.client_timestamp
         RETURNING {COLUMNS}"
    );
    let raw = conn
        .query_row(
            &sql,
            params![
                user_id.0,
                payload.form_id.0,
                values,
                SubmissionStatus::Submitted.as_str(),
                fmt_ts(now),
                fmt_ts(payload.client_timestamp),
            ],
            RawRecord::read,
        )
        .map_err(|e| to_storage_err(format!("upsert submission: {e}")))?;
    raw.decode()
}

pub fn get(conn: &Connection, user_id: UserId, form_id: FormId) -> FormSyncResult<Option<StoredSubmissionRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM submissions WHERE user_id = ?1 AND form_id = ?2");
    conn.query_row(&sql, params![user_id.0, form_id.0], RawRecord::read)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?
        .map(RawRecord::decode)
        .transpose()
}

/// A user's records, most recently updated first.
pub fn list_for_user(conn: &Connection, user_id: UserId) -> FormSyncResult<Vec<StoredSubmissionRecord>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM submissions WHERE user_id = ?1 ORDER BY updated_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![user_id.0], RawRecord::read)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))?.decode()?);
    }
    Ok(out)
}

/// Move a record to a new status. Returns `None` when no record exists.
pub fn set_status(
    conn: &Connection,
    user_id: UserId,
    form_id: FormId,
    status: SubmissionStatus,
    now: DateTime<Utc>,
) -> FormSyncResult<Option<StoredSubmissionRecord>> {
    let sql = format!(
        "UPDATE submissions SET status = ?3, updated_at = ?4
         WHERE user_id = ?1 AND form_id = ?2
         RETURNING {COLUMNS}"
    );
    conn.query_row(
        &sql,
        params![user_id.0, form_id.0, status.as_str(), fmt_ts(now)],
        RawRecord::read,
    )
    .optional()
    .map_err(|e| to_storage_err(format!("set status: {e}")))?
    .map(RawRecord::decode)
    .transpose()
}

/// Number of rows for a key. Always 0 or 1.
pub fn count_for_key(conn: &Connection, user_id: UserId, form_id: FormId) -> FormSyncResult<usize> {
    let n: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM submissions WHERE user_id = ?1 AND form_id = ?2",
            params![user_id.0, form_id.0],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n as usize)
}

struct RawRecord {
    id: i64,
    user_id: i64,
    form_id: i64,
    values: String,
    status: String,
    submitted_at: String,
    updated_at: String,
    client_timestamp: String,
}

impl RawRecord {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            form_id: row.get(2)?,
            values: row.get(3)?,
            status: row.get(4)?,
            submitted_at: row.get(5)?,
            updated_at: row.get(6)?,
            client_timestamp: row.get(7)?,
        })
    }

    fn decode(self) -> FormSyncResult<StoredSubmissionRecord> {
        let status = self
            .status
            .parse::<SubmissionStatus>()
            .map_err(|e| corrupt(TABLE, e))?;
        Ok(StoredSubmissionRecord {
            id: self.id,
            user_id: UserId(self.user_id),
            form_id: FormId(self.form_id),
            values: parse_values(TABLE, &self.values)?,
            status,
            submitted_at: parse_ts(TABLE, &self.submitted_at)?,
            updated_at: parse_ts(TABLE, &self.updated_at)?,
            client_timestamp: parse_ts(TABLE, &self.client_timestamp)?,
        })
    }
}
