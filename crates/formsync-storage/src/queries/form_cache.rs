//! Cached form definitions on the client.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use formsync_core::errors::FormSyncResult;
use formsync_core::models::{FormDefinition, FormId};

use super::{corrupt, fmt_ts};
use crate::to_storage_err;

const TABLE: &str = "form_cache";

/// Insert or wholesale-replace the cached copy of a form.
pub fn put_form(conn: &Connection, form: &FormDefinition, fetched_at: DateTime<Utc>) -> FormSyncResult<()> {
    let definition = serde_json::to_string(form)?;
    conn.execute(
        "INSERT INTO form_cache (form_id, title, definition, fetched_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(form_id) DO UPDATE SET
             title = excluded.title,
             definition = excluded.definition,
             fetched_at = excluded.fetched_at",
        params![form.id.0, form.title, definition, fmt_ts(fetched_at)],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_form(conn: &Connection, form_id: FormId) -> FormSyncResult<Option<FormDefinition>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT definition FROM form_cache WHERE form_id = ?1",
            params![form_id.0],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    raw.map(|json| decode(&json)).transpose()
}

/// Every cached form, ordered by title.
pub fn list_forms(conn: &Connection) -> FormSyncResult<Vec<FormDefinition>> {
    let mut stmt = conn
        .prepare("SELECT definition FROM form_cache ORDER BY title, form_id")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut forms = Vec::new();
    for row in rows {
        let json = row.map_err(|e| to_storage_err(e.to_string()))?;
        forms.push(decode(&json)?);
    }
    Ok(forms)
}

pub fn remove_form(conn: &Connection, form_id: FormId) -> FormSyncResult<bool> {
    let removed = conn
        .execute("DELETE FROM form_cache WHERE form_id = ?1", params![form_id.0])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(removed > 0)
}

fn decode(json: &str) -> FormSyncResult<FormDefinition> {
    serde_json::from_str(json).map_err(|e| corrupt(TABLE, e.to_string()))
}
