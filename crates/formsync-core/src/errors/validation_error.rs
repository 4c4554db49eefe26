/// Malformed payload shapes, rejected per item with a descriptive reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("payload has no form id")]
    MissingFormId,

    #[error("form id '{raw}' is not a valid id")]
    InvalidFormId { raw: String },

    #[error("values must be an object, got {found}")]
    ValuesNotObject { found: String },

    #[error("timestamp '{raw}' is not RFC 3339")]
    InvalidTimestamp { raw: String },

    #[error("submission id '{raw}' is not a UUID")]
    InvalidSubmissionId { raw: String },

    #[error("field '{field}' does not exist on form {form_id}")]
    UnknownField { field: String, form_id: i64 },

    #[error("field '{field}' appears twice on step {step}")]
    DuplicateField { field: String, step: usize },

    #[error("payload must be a JSON object, got {found}")]
    NotAnObject { found: String },

    #[error("batch of {size} exceeds limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    #[error("empty batch")]
    EmptyBatch,
}
