//! Dead letters: queued submissions the server processed but refused.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use formsync_core::errors::FormSyncResult;
use formsync_core::models::{FormId, RejectedSubmission, SubmissionId, SubmissionPayload};

use super::{corrupt, fmt_ts, parse_ts, parse_values};
use crate::to_storage_err;

const TABLE: &str = "rejected_submissions";

pub fn insert(
    conn: &Connection,
    payload: &SubmissionPayload,
    reason: &str,
    rejected_at: DateTime<Utc>,
) -> FormSyncResult<()> {
    let values = serde_json::to_string(&payload.values)?;
    conn.execute(
        "INSERT INTO rejected_submissions
             (submission_id, form_id, field_values, client_timestamp, reason, rejected_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            payload.submission_id.0.to_string(),
            payload.form_id.0,
            values,
            fmt_ts(payload.client_timestamp),
            reason,
            fmt_ts(rejected_at),
        ],
    )
    .map_err(|e| to_storage_err(format!("insert rejected: {e}")))?;
    Ok(())
}

pub fn list_all(conn: &Connection) -> FormSyncResult<Vec<RejectedSubmission>> {
    let mut stmt = conn
        .prepare(
            "SELECT submission_id, form_id, field_values, client_timestamp, reason, rejected_at
             FROM rejected_submissions ORDER BY id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (submission_id, form_id, values, client_ts, reason, rejected_at) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let submission_id = Uuid::parse_str(&submission_id)
            .map_err(|e| corrupt(TABLE, format!("bad submission id: {e}")))?;
        out.push(RejectedSubmission {
            payload: SubmissionPayload {
                submission_id: SubmissionId(submission_id),
                form_id: FormId(form_id),
                values: parse_values(TABLE, &values)?,
                client_timestamp: parse_ts(TABLE, &client_ts)?,
            },
            reason,
            rejected_at: parse_ts(TABLE, &rejected_at)?,
        });
    }
    Ok(out)
}
