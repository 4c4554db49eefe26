//! Form definitions as published by the server and cached by the client.

use serde::{Deserialize, Serialize};

use super::ids::FormId;

/// Input kind of a field. Only presence is validated; the kind drives rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Textarea,
    Number,
    Date,
    Email,
    Select,
    Checkbox,
}

/// One input on a form. `name` is unique within its step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Choices for `Select` fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// An ordered group of fields shown together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub title: Option<String>,
    pub fields: Vec<Field>,
}

/// Full structure of a form.
///
/// Either `steps` is non-empty (multi-step form) or the flat `fields` list is
/// treated as a single step. Immutable once fetched; the client replaces the
/// cached copy wholesale on every successful online fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub id: FormId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl FormDefinition {
    /// Number of steps the fill flow walks through. A flat form has one.
    pub fn step_count(&self) -> usize {
        if self.steps.is_empty() {
            1
        } else {
            self.steps.len()
        }
    }

    /// Index of the final step.
    pub fn last_step(&self) -> usize {
        self.step_count() - 1
    }

    /// Fields shown on the given step.
    pub fn step_fields(&self, index: usize) -> Option<&[Field]> {
        if self.steps.is_empty() {
            (index == 0).then_some(self.fields.as_slice())
        } else {
            self.steps.get(index).map(|s| s.fields.as_slice())
        }
    }

    /// Locate a field by name, returning its step index.
    pub fn find_field(&self, name: &str) -> Option<(usize, &Field)> {
        (0..self.step_count()).find_map(|step| {
            self.step_fields(step)
                .and_then(|fields| fields.iter().find(|f| f.name == name))
                .map(|f| (step, f))
        })
    }

    pub fn summary(&self) -> FormSummary {
        FormSummary {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            step_count: self.step_count(),
        }
    }
}

/// List entry returned by fetch-forms. Carries no structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: FormId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub step_count: usize,
}
