//! Versioned wire envelope, JSON with forward compatibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use formsync_core::constants::PROTOCOL_VERSION;
use formsync_core::errors::{FormSyncResult, TransportError};

/// Envelope for request bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRequest<T> {
    pub version: String,
    /// Unique request ID for tracing.
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

/// Envelope for every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub version: String,
    /// Echoed request ID; empty for GETs.
    #[serde(default)]
    pub request_id: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiRequest<T> {
    pub fn new(payload: T) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn ok(request_id: String, data: T) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            request_id,
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn err(request_id: String, error: String) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            request_id,
            success: false,
            error: Some(error),
            data: None,
        }
    }

    /// Unwrap the payload, checking the major version.
    ///
    /// `status` is the HTTP status the envelope arrived with, reported when
    /// the server flagged the call as failed.
    pub fn into_data(self, status: u16) -> FormSyncResult<T> {
        if major(&self.version) != major(PROTOCOL_VERSION) {
            return Err(TransportError::VersionMismatch {
                expected: PROTOCOL_VERSION.to_string(),
                actual: self.version,
            }
            .into());
        }
        if !self.success {
            return Err(TransportError::Status {
                status,
                body: self.error.unwrap_or_default(),
            }
            .into());
        }
        self.data.ok_or_else(|| {
            TransportError::Decode {
                reason: "response has no data".to_string(),
            }
            .into()
        })
    }
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}
