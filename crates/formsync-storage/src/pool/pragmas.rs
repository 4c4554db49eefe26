//! PRAGMA configuration applied to every SQLite connection.

use rusqlite::Connection;

use formsync_core::config::StorageConfig;
use formsync_core::errors::FormSyncResult;

use crate::to_storage_err;

/// Connection-level settings taken from `StorageConfig`.
#[derive(Debug, Clone)]
pub struct PragmaOptions {
    pub wal_mode: bool,
    pub busy_timeout_ms: u32,
}

impl Default for PragmaOptions {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl From<&StorageConfig> for PragmaOptions {
    fn from(config: &StorageConfig) -> Self {
        Self {
            wal_mode: config.wal_mode,
            busy_timeout_ms: config.busy_timeout_ms,
        }
    }
}

/// Apply durability and safety pragmas to the write connection.
pub fn apply_pragmas(conn: &Connection, options: &PragmaOptions) -> FormSyncResult<()> {
    let journal = if options.wal_mode { "WAL" } else { "DELETE" };
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = {journal};
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = {};
        PRAGMA foreign_keys = ON;
        ",
        options.busy_timeout_ms
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Read connections only need the busy timeout.
pub fn apply_read_pragmas(conn: &Connection, options: &PragmaOptions) -> FormSyncResult<()> {
    conn.busy_timeout(std::time::Duration::from_millis(u64::from(
        options.busy_timeout_ms,
    )))
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> FormSyncResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
