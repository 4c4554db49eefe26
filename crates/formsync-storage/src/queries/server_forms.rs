//! Published forms on the server.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use formsync_core::errors::FormSyncResult;
use formsync_core::models::{FormDefinition, FormId, FormSummary, TenantId};

use super::{corrupt, fmt_ts};
use crate::to_storage_err;

const TABLE: &str = "forms";

/// Publish a form for a tenant, replacing any previous version with the same id.
pub fn publish(
    conn: &Connection,
    tenant_id: TenantId,
    form: &FormDefinition,
    published_at: DateTime<Utc>,
) -> FormSyncResult<()> {
    let definition = serde_json::to_string(form)?;
    conn.execute(
        "INSERT INTO forms (form_id, tenant_id, title, definition, published_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(form_id) DO UPDATE SET
             tenant_id = excluded.tenant_id,
             title = excluded.title,
             definition = excluded.definition,
             published_at = excluded.published_at",
        params![form.id.0, tenant_id.0, form.title, definition, fmt_ts(published_at)],
    )
    .map_err(|e| to_storage_err(format!("publish form: {e}")))?;
    Ok(())
}

/// Look up a form with its owning tenant.
pub fn get(conn: &Connection, form_id: FormId) -> FormSyncResult<Option<(TenantId, FormDefinition)>> {
    let row: Option<(i64, String)> = conn
        .query_row(
            "SELECT tenant_id, definition FROM forms WHERE form_id = ?1",
            params![form_id.0],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    row.map(|(tenant, json)| Ok((TenantId(tenant), decode(&json)?)))
        .transpose()
}

pub fn exists(conn: &Connection, form_id: FormId) -> FormSyncResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM forms WHERE form_id = ?1",
            params![form_id.0],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(found.is_some())
}

/// Summaries of a tenant's forms, ordered by title.
pub fn list_for_tenant(conn: &Connection, tenant_id: TenantId) -> FormSyncResult<Vec<FormSummary>> {
    let mut stmt = conn
        .prepare("SELECT definition FROM forms WHERE tenant_id = ?1 ORDER BY title, form_id")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![tenant_id.0], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let json = row.map_err(|e| to_storage_err(e.to_string()))?;
        out.push(decode(&json)?.summary());
    }
    Ok(out)
}

fn decode(json: &str) -> FormSyncResult<FormDefinition> {
    serde_json::from_str(json).map_err(|e| corrupt(TABLE, e.to_string()))
}
