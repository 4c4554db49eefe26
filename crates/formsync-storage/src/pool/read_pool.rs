//! Read-only connections for file-backed databases.
//!
//! Under WAL a reader never waits on the writer, so queue reads during a
//! flush (`drain_all`, `pending_count`) and server listings proceed while
//! enqueues and upserts hold the write connection.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};

use formsync_core::errors::FormSyncResult;

use super::pragmas::{apply_read_pragmas, PragmaOptions};
use crate::to_storage_err;

/// Upper bound on `StorageConfig::read_pool_size`.
const MAX_READERS: usize = 8;

/// Fixed set of read-only connections handed out round-robin.
pub struct ReadPool {
    connections: Vec<Mutex<Connection>>,
    cursor: AtomicUsize,
}

impl ReadPool {
    /// Open `pool_size` readers (clamped to 1..=8) on an existing database file.
    pub fn open(path: &Path, pool_size: usize, options: &PragmaOptions) -> FormSyncResult<Self> {
        let connections = (0..pool_size.clamp(1, MAX_READERS))
            .map(|_| -> FormSyncResult<Mutex<Connection>> {
                let conn = Connection::open_with_flags(
                    path,
                    OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
                )
                .map_err(|e| to_storage_err(format!("open reader on {}: {e}", path.display())))?;
                apply_read_pragmas(&conn, options)?;
                Ok(Mutex::new(conn))
            })
            .collect::<FormSyncResult<Vec<_>>>()?;

        Ok(Self {
            connections,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Run `f` on the next reader.
    pub fn with_conn<F, T>(&self, f: F) -> FormSyncResult<T>
    where
        F: FnOnce(&Connection) -> FormSyncResult<T>,
    {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let guard = self.connections[idx]
            .lock()
            .map_err(|e| to_storage_err(format!("reader {idx} poisoned: {e}")))?;
        f(&guard)
    }

    pub fn size(&self) -> usize {
        self.connections.len()
    }
}
