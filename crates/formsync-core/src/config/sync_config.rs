use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Client transport and sync behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the form server.
    pub base_url: String,
    /// Per-request timeout. Expiry counts as a transport failure.
    pub timeout_ms: u64,
    /// Retries inside one send before giving up to the offline queue.
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Connectivity assumed before the first signal arrives.
    pub start_online: bool,
}

impl SyncConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_BASE_URL.to_string(),
            timeout_ms: defaults::DEFAULT_TIMEOUT_MS,
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            initial_backoff_ms: defaults::DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: defaults::DEFAULT_MAX_BACKOFF_MS,
            start_online: defaults::DEFAULT_START_ONLINE,
        }
    }
}
