//! # formsync-core
//!
//! Foundation crate for the formsync engine.
//! Defines the form and submission model, the wire shapes shared by client and
//! server, traits at the transport/identity seams, errors, config, and constants.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::FormSyncConfig;
pub use errors::{FormSyncError, FormSyncResult};
pub use models::{
    FieldValues, FormDefinition, FormId, QueuedSubmission, StoredSubmissionRecord, SubmissionId,
    SubmissionPayload, SubmissionStatus, UserId, UserIdentity,
};
