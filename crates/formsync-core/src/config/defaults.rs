// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_CLIENT_DB_FILENAME: &str = "formsync-client.db";
pub const DEFAULT_SERVER_DB_FILENAME: &str = "formsync-server.db";
pub const DEFAULT_WAL_MODE: bool = true;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Sync ---
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 500;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 10_000;
pub const DEFAULT_START_ONLINE: bool = true;

// --- Server ---
pub const DEFAULT_MAX_BATCH_SIZE: usize = crate::constants::MAX_BATCH_SIZE;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
