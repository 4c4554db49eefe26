//! Pending-submission queue on the client.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use formsync_core::errors::FormSyncResult;
use formsync_core::models::{FormId, QueuedSubmission, SubmissionId, SubmissionPayload};

use super::{corrupt, fmt_ts, parse_ts, parse_values};
use crate::to_storage_err;

const TABLE: &str = "pending_submissions";

/// Append a payload. Returns false when the same submission id is already queued.
pub fn enqueue(conn: &Connection, payload: &SubmissionPayload, now: DateTime<Utc>) -> FormSyncResult<bool> {
    let values = serde_json::to_string(&payload.values)?;
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO pending_submissions
                 (submission_id, form_id, field_values, client_timestamp, enqueued_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                payload.submission_id.0.to_string(),
                payload.form_id.0,
                values,
                fmt_ts(payload.client_timestamp),
                fmt_ts(now),
            ],
        )
        .map_err(|e| to_storage_err(format!("enqueue: {e}")))?;
    Ok(inserted == 1)
}

/// All queued entries in insertion order.
pub fn list_all(conn: &Connection) -> FormSyncResult<Vec<QueuedSubmission>> {
    let mut stmt = conn
        .prepare(
            "SELECT seq, submission_id, form_id, field_values, client_timestamp, enqueued_at
             FROM pending_submissions ORDER BY seq ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], RawRow::read)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        out.push(raw.decode()?);
    }
    Ok(out)
}

pub fn count(conn: &Connection) -> FormSyncResult<usize> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM pending_submissions", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(n as usize)
}

pub fn clear_all(conn: &Connection) -> FormSyncResult<usize> {
    conn.execute("DELETE FROM pending_submissions", [])
        .map_err(|e| to_storage_err(format!("clear_all: {e}")))
}

/// Remove entries up to and including `seq`.
pub fn clear_through(conn: &Connection, seq: i64) -> FormSyncResult<usize> {
    conn.execute("DELETE FROM pending_submissions WHERE seq <= ?1", params![seq])
        .map_err(|e| to_storage_err(format!("clear_through: {e}")))
}

struct RawRow {
    seq: i64,
    submission_id: String,
    form_id: i64,
    values: String,
    client_timestamp: String,
    enqueued_at: String,
}

impl RawRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            seq: row.get(0)?,
            submission_id: row.get(1)?,
            form_id: row.get(2)?,
            values: row.get(3)?,
            client_timestamp: row.get(4)?,
            enqueued_at: row.get(5)?,
        })
    }

    fn decode(self) -> FormSyncResult<QueuedSubmission> {
        let submission_id = Uuid::parse_str(&self.submission_id)
            .map_err(|e| corrupt(TABLE, format!("bad submission id: {e}")))?;
        Ok(QueuedSubmission {
            seq: self.seq,
            payload: SubmissionPayload {
                submission_id: SubmissionId(submission_id),
                form_id: FormId(self.form_id),
                values: parse_values(TABLE, &self.values)?,
                client_timestamp: parse_ts(TABLE, &self.client_timestamp)?,
            },
            enqueued_at: parse_ts(TABLE, &self.enqueued_at)?,
        })
    }
}

/// Commit a processed batch: dead-letter the refused items and clear the
/// queue through `seq`, all-or-nothing.
pub fn acknowledge(
    conn: &Connection,
    seq: i64,
    rejections: &[(SubmissionPayload, String)],
    now: DateTime<Utc>,
) -> FormSyncResult<usize> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("acknowledge begin: {e}")))?;

    match acknowledge_inner(&tx, seq, rejections, now) {
        Ok(cleared) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("acknowledge commit: {e}")))?;
            Ok(cleared)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

fn acknowledge_inner(
    conn: &Connection,
    seq: i64,
    rejections: &[(SubmissionPayload, String)],
    now: DateTime<Utc>,
) -> FormSyncResult<usize> {
    for (payload, reason) in rejections {
        super::rejected::insert(conn, payload, reason, now)?;
    }
    clear_through(conn, seq)
}
