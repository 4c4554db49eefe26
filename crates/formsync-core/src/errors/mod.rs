//! Error taxonomy.
//!
//! `Transport` failures are recovered by the offline queue, `Storage` faults are
//! surfaced to the user, `NotFound` and `Validation` are reported per batch item.

mod storage_error;
mod transport_error;
mod validation_error;

pub use storage_error::StorageError;
pub use transport_error::TransportError;
pub use validation_error::ValidationError;

use crate::models::{FormId, UserId};

/// Result alias used across every formsync crate.
pub type FormSyncResult<T> = Result<T, FormSyncError>;

/// Root error type.
#[derive(Debug, thiserror::Error)]
pub enum FormSyncError {
    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("transport error: {0}")]
    TransportError(#[from] TransportError),

    #[error("validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("form not found: {form_id}")]
    FormNotFound { form_id: FormId },

    #[error("submission not found for user {user_id} on form {form_id}")]
    SubmissionNotFound { user_id: UserId, form_id: FormId },

    #[error("cannot {action} while {state}")]
    InvalidTransition { state: String, action: String },

    #[error("required field '{field}' on step {step} has no value")]
    MissingRequired { field: String, step: usize },

    #[error("unauthenticated: {reason}")]
    Unauthenticated { reason: String },

    #[error("config error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FormSyncError {
    /// Whether the failure can be retried transparently through the offline queue.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }

    /// Whether the failure must be surfaced immediately ("unable to save form").
    pub fn is_fatal_to_attempt(&self) -> bool {
        matches!(self, Self::StorageError(_))
    }
}
