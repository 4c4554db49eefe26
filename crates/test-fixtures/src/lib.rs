//! Shared fixtures for formsync tests: form definitions loaded from JSON,
//! payload builders, and a scriptable in-process transport.

mod scripted;

use std::path::PathBuf;

use chrono::Utc;
use serde::de::DeserializeOwned;

use formsync_core::models::{Field, FieldKind, FieldValues, FormDefinition, FormId, Step, SubmissionPayload};

pub use scripted::ScriptedTransport;

/// Root directory of the JSON fixtures.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Three-step form, id 3.
pub fn incident_report() -> FormDefinition {
    load_fixture("forms/incident_report.json")
}

/// Flat single-step form, id 5.
pub fn attendance() -> FormDefinition {
    load_fixture("forms/attendance.json")
}

/// Two-step form, id 8.
pub fn beneficiary_survey() -> FormDefinition {
    load_fixture("forms/beneficiary_survey.json")
}

/// Every fixture form, sorted by id.
pub fn all_forms() -> Vec<FormDefinition> {
    let dir = fixtures_root().join("forms");
    let mut forms: Vec<FormDefinition> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to list {}: {}", dir.display(), e))
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .map(|p| {
            let name = p.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
            load_fixture(&format!("forms/{name}"))
        })
        .collect();
    forms.sort_by_key(|f| f.id);
    forms
}

/// A form with `steps` steps of one optional text field each, named `f0`, `f1`, ...
pub fn form_with_steps(id: i64, title: &str, steps: usize) -> FormDefinition {
    FormDefinition {
        id: FormId(id),
        title: title.to_string(),
        description: None,
        steps: (0..steps)
            .map(|i| Step {
                title: Some(format!("Step {}", i + 1)),
                fields: vec![Field::new(format!("f{i}"), format!("Field {i}"), FieldKind::Text)],
            })
            .collect(),
        fields: Vec::new(),
    }
}

/// Flat form with the given optional text fields.
pub fn flat_form(id: i64, title: &str, fields: &[&str]) -> FormDefinition {
    FormDefinition {
        id: FormId(id),
        title: title.to_string(),
        description: None,
        steps: Vec::new(),
        fields: fields
            .iter()
            .map(|name| Field::new(*name, *name, FieldKind::Text))
            .collect(),
    }
}

/// Build field values from a JSON object literal.
///
/// # Panics
/// Panics if `values` is not an object.
pub fn values(values: serde_json::Value) -> FieldValues {
    match values {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A fresh payload stamped now.
pub fn payload(form_id: i64, field_values: serde_json::Value) -> SubmissionPayload {
    SubmissionPayload::new(FormId(form_id), values(field_values), Utc::now())
}
