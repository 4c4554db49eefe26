//! Configuration, loaded from TOML. Every section falls back to `defaults`.

pub mod defaults;
mod observability_config;
mod server_config;
mod storage_config;
mod sync_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use observability_config::ObservabilityConfig;
pub use server_config::ServerConfig;
pub use storage_config::StorageConfig;
pub use sync_config::SyncConfig;

use crate::errors::{FormSyncError, FormSyncResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSyncConfig {
    pub storage: StorageConfig,
    pub sync: SyncConfig,
    pub server: ServerConfig,
    pub observability: ObservabilityConfig,
}

impl FormSyncConfig {
    /// Parse a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml(s: &str) -> FormSyncResult<Self> {
        toml::from_str(s).map_err(|e| FormSyncError::ConfigError(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> FormSyncResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            FormSyncError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }
}
