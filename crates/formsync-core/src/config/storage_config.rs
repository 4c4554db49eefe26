use serde::{Deserialize, Serialize};

use super::defaults;

/// Storage configuration for both the client store and the server store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file backing the client's form cache and pending queue.
    pub client_db_path: String,
    /// SQLite file backing the server's forms and submission records.
    pub server_db_path: String,
    /// Enable WAL journal mode.
    pub wal_mode: bool,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
    /// Number of read connections in the server pool.
    pub read_pool_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            client_db_path: defaults::DEFAULT_CLIENT_DB_FILENAME.to_string(),
            server_db_path: defaults::DEFAULT_SERVER_DB_FILENAME.to_string(),
            wal_mode: defaults::DEFAULT_WAL_MODE,
            busy_timeout_ms: defaults::DEFAULT_BUSY_TIMEOUT_MS,
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
        }
    }
}
