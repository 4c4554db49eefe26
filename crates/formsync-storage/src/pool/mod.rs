//! Connection pool managing the write connection and read connections.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;

use formsync_core::errors::FormSyncResult;

pub use pragmas::PragmaOptions;
pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// Owns the single write connection and, for file-backed databases, the
/// read connection pool.
pub struct ConnectionPool {
    pub writer: Arc<WriteConnection>,
    /// `None` for in-memory databases: a second in-memory connection would
    /// be a separate, empty database.
    pub readers: Option<Arc<ReadPool>>,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open a connection pool for the given database file.
    pub fn open(path: &Path, read_pool_size: usize, options: &PragmaOptions) -> FormSyncResult<Self> {
        let writer = Arc::new(WriteConnection::open(path, options)?);
        let readers = Arc::new(ReadPool::open(path, read_pool_size, options)?);
        Ok(Self {
            writer,
            readers: Some(readers),
            db_path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory pool (for testing). Every read goes through the writer.
    pub fn open_in_memory(options: &PragmaOptions) -> FormSyncResult<Self> {
        let writer = Arc::new(WriteConnection::open_in_memory(options)?);
        Ok(Self {
            writer,
            readers: None,
            db_path: None,
        })
    }

    /// Run a read-only closure on a reader, or on the writer when there are none.
    pub async fn read<F, T>(&self, f: F) -> FormSyncResult<T>
    where
        F: FnOnce(&Connection) -> FormSyncResult<T>,
    {
        match &self.readers {
            Some(readers) => readers.with_conn(f),
            None => self.writer.with_conn(f).await,
        }
    }
}
