use serde::{Deserialize, Serialize};

use super::defaults;

/// Submit endpoint limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Largest batch accepted in one request.
    pub max_batch_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_batch_size: defaults::DEFAULT_MAX_BATCH_SIZE,
        }
    }
}
