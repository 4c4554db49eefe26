//! Single write connection behind `tokio::sync::Mutex`.
//! Writes are serialized through this one connection.

use std::path::Path;

use rusqlite::Connection;
use tokio::sync::Mutex;

use formsync_core::errors::{FormSyncError, FormSyncResult, StorageError};

use super::pragmas::{apply_pragmas, PragmaOptions};
use crate::to_storage_err;

/// A single write connection protected by an async mutex.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open a new write connection to the given database path.
    pub fn open(path: &Path, options: &PragmaOptions) -> FormSyncResult<Self> {
        let conn = Connection::open(path).map_err(|e| {
            FormSyncError::from(StorageError::Unavailable {
                reason: format!("{}: {e}", path.display()),
            })
        })?;
        apply_pragmas(&conn, options)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory(options: &PragmaOptions) -> FormSyncResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, options)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and execute a closure with the connection.
    /// The lock is released when the closure returns, on every path.
    pub async fn with_conn<F, T>(&self, f: F) -> FormSyncResult<T>
    where
        F: FnOnce(&Connection) -> FormSyncResult<T>,
    {
        let guard = self.conn.lock().await;
        f(&guard)
    }

    /// Non-async access for startup work (migrations).
    /// Fails instead of blocking if the writer is already held.
    pub fn with_conn_sync<F, T>(&self, f: F) -> FormSyncResult<T>
    where
        F: FnOnce(&Connection) -> FormSyncResult<T>,
    {
        let guard = self.conn.try_lock().map_err(|_| {
            FormSyncError::from(StorageError::Unavailable {
                reason: "write connection is busy".to_string(),
            })
        })?;
        f(&guard)
    }
}
