//! # formsync-storage
//!
//! SQLite persistence for both ends of the engine.
//!
//! - [`LocalStore`]: the client's durable store. Two independent collections,
//!   cached form definitions keyed by form id and the insertion-ordered queue of
//!   pending submissions, plus a dead-letter list of refused submissions.
//! - [`ServerStore`]: published forms and the submission records, unique per
//!   (user, form) and written with an atomic upsert.

pub mod local_store;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod server_store;

pub use local_store::LocalStore;
pub use server_store::ServerStore;

use formsync_core::errors::{FormSyncError, StorageError};

/// Map any displayable failure into a storage error.
pub(crate) fn to_storage_err(message: impl Into<String>) -> FormSyncError {
    StorageError::SqliteError {
        message: message.into(),
    }
    .into()
}
