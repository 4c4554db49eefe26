use chrono::Utc;
use serde_json::json;

use formsync_core::models::*;

fn two_step_form() -> FormDefinition {
    FormDefinition {
        id: FormId(3),
        title: "Site inspection".into(),
        description: None,
        steps: vec![
            Step {
                title: Some("Location".into()),
                fields: vec![Field::new("site", "Site", FieldKind::Text)],
            },
            Step {
                title: Some("Findings".into()),
                fields: vec![
                    Field::new("score", "Score", FieldKind::Number).required(),
                    Field::new("notes", "Notes", FieldKind::Textarea),
                ],
            },
        ],
        fields: vec![],
    }
}

#[test]
fn flat_form_is_a_single_step() {
    let form = FormDefinition {
        id: FormId(1),
        title: "Feedback".into(),
        description: None,
        steps: vec![],
        fields: vec![Field::new("comment", "Comment", FieldKind::Text)],
    };
    assert_eq!(form.step_count(), 1);
    assert_eq!(form.last_step(), 0);
    assert_eq!(form.step_fields(0).unwrap().len(), 1);
    assert!(form.step_fields(1).is_none());
}

#[test]
fn find_field_reports_owning_step() {
    let form = two_step_form();
    let (step, field) = form.find_field("score").unwrap();
    assert_eq!(step, 1);
    assert!(field.required);
    assert!(form.find_field("missing").is_none());
}

#[test]
fn summary_has_no_structure_but_counts_steps() {
    let summary = two_step_form().summary();
    assert_eq!(summary.id, FormId(3));
    assert_eq!(summary.step_count, 2);
}

#[test]
fn form_definition_deserializes_with_defaults() {
    let form: FormDefinition = serde_json::from_value(json!({
        "id": 9,
        "title": "Minimal",
        "fields": [{"name": "a", "label": "A"}]
    }))
    .unwrap();
    assert_eq!(form.fields[0].kind, FieldKind::Text);
    assert!(!form.fields[0].required);
    assert!(form.steps.is_empty());
}

#[test]
fn submit_request_distinguishes_single_and_batch() {
    let single: SubmitRequest = serde_json::from_value(json!({"form": 3, "data": {}})).unwrap();
    assert!(matches!(single, SubmitRequest::Single(_)));

    let batch: SubmitRequest =
        serde_json::from_value(json!([{"form_id": 3}, {"form_id": 4}])).unwrap();
    assert_eq!(batch.len(), 2);
}

#[test]
fn raw_payload_from_canonical_payload_keeps_keys() {
    let mut values = FieldValues::new();
    values.insert("a".into(), json!(1));
    let payload = SubmissionPayload::new(FormId(3), values, Utc::now());
    let raw = RawPayload::from(&payload);
    assert_eq!(raw.0["form_id"], json!(3));
    assert_eq!(raw.0["values"]["a"], json!(1));
    assert_eq!(
        raw.0["submission_id"],
        json!(payload.submission_id.0.to_string())
    );
}

#[test]
fn item_outcome_tags_serialize_snake_case() {
    let outcome = ItemOutcome::NotFound {
        form_id: "999".into(),
    };
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["outcome"], json!("not_found"));
    assert!(outcome.rejection_reason().unwrap().contains("999"));
}

#[test]
fn submission_status_parses_its_own_strings() {
    for status in [
        SubmissionStatus::Submitted,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
    ] {
        assert_eq!(status.as_str().parse::<SubmissionStatus>().unwrap(), status);
    }
    assert!("archived".parse::<SubmissionStatus>().is_err());
}
