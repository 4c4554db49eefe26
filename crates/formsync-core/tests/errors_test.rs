use formsync_core::errors::*;
use formsync_core::models::{FormId, UserId};

#[test]
fn form_not_found_carries_id() {
    let err = FormSyncError::FormNotFound { form_id: FormId(42) };
    assert!(err.to_string().contains("42"));
}

#[test]
fn invalid_transition_names_state_and_action() {
    let err = FormSyncError::InvalidTransition {
        state: "reviewing".into(),
        action: "back".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("reviewing"));
    assert!(msg.contains("back"));
}

#[test]
fn submission_not_found_carries_key() {
    let err = FormSyncError::SubmissionNotFound {
        user_id: UserId(7),
        form_id: FormId(3),
    };
    let msg = err.to_string();
    assert!(msg.contains('7'));
    assert!(msg.contains('3'));
}

// --- From impls ---

#[test]
fn storage_error_converts_and_is_fatal() {
    let err: FormSyncError = StorageError::SqliteError {
        message: "disk full".into(),
    }
    .into();
    assert!(matches!(err, FormSyncError::StorageError(_)));
    assert!(err.is_fatal_to_attempt());
    assert!(!err.is_retryable());
}

#[test]
fn transport_error_converts_and_is_retryable() {
    let err: FormSyncError = TransportError::Timeout { timeout_ms: 30_000 }.into();
    assert!(matches!(err, FormSyncError::TransportError(_)));
    assert!(err.is_retryable());
    assert!(!err.is_fatal_to_attempt());
}

#[test]
fn validation_error_is_neither_retryable_nor_fatal() {
    let err: FormSyncError = ValidationError::MissingFormId.into();
    assert!(!err.is_retryable());
    assert!(!err.is_fatal_to_attempt());
}

#[test]
fn http_status_error_carries_code_and_body() {
    let err = TransportError::Status {
        status: 503,
        body: "maintenance".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("503"));
    assert!(msg.contains("maintenance"));
}

#[test]
fn batch_too_large_carries_sizes() {
    let msg = ValidationError::BatchTooLarge { size: 900, limit: 500 }.to_string();
    assert!(msg.contains("900"));
    assert!(msg.contains("500"));
}

#[test]
fn shape_errors_describe_the_offending_input() {
    let dup = ValidationError::DuplicateField {
        field: "site".into(),
        step: 1,
    };
    assert_eq!(dup.to_string(), "field 'site' appears twice on step 1");

    let not_object = ValidationError::NotAnObject {
        found: "a string".into(),
    };
    assert!(not_object.to_string().contains("a string"));
}
