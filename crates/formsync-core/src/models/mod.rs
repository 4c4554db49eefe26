//! Domain model: form definitions, submissions, identities, and wire shapes.

pub mod form;
pub mod ids;
pub mod identity;
pub mod submission;
pub mod wire;

pub use form::{Field, FieldKind, FormDefinition, FormSummary, Step};
pub use identity::UserIdentity;
pub use ids::{FormId, SubmissionId, TenantId, UserId};
pub use submission::{
    FieldValues, QueuedSubmission, RejectedSubmission, StoredSubmissionRecord, SubmissionPayload,
    SubmissionStatus,
};
pub use wire::{ItemOutcome, RawPayload, SubmitRequest, SubmitResponse};
