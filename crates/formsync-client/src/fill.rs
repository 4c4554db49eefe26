//! Form fill state machine.
//!
//! `Filling(step)` walks the form's steps in order, `Reviewing` shows the
//! collected draft, `Submitted` is terminal. The draft lives only in memory:
//! dropping a [`FormFill`] discards it and nothing partial ever leaves.

use std::fmt;

use chrono::Utc;

use formsync_core::errors::{FormSyncError, FormSyncResult, ValidationError};
use formsync_core::models::{Field, FieldValues, FormDefinition, SubmissionPayload};
use formsync_core::traits::SubmissionTransport;

use crate::coordinator::{SubmitOutcome, SyncCoordinator};

/// Where the user is in the fill flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillState {
    Filling { step: usize },
    Reviewing,
    Submitted,
}

impl fmt::Display for FillState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filling { step } => write!(f, "filling step {step}"),
            Self::Reviewing => f.write_str("reviewing"),
            Self::Submitted => f.write_str("submitted"),
        }
    }
}

/// Drives one user through one form.
#[derive(Debug)]
pub struct FormFill {
    form: FormDefinition,
    state: FillState,
    draft: FieldValues,
}

impl FormFill {
    pub fn new(form: FormDefinition) -> Self {
        let span = formsync_observability::fill_span!(form.id);
        let _entered = span.enter();
        tracing::debug!(steps = form.step_count(), "fill started");
        Self {
            form,
            state: FillState::Filling { step: 0 },
            draft: FieldValues::new(),
        }
    }

    pub fn state(&self) -> FillState {
        self.state
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn draft(&self) -> &FieldValues {
        &self.draft
    }

    /// Fields on the current step; empty outside `Filling`.
    pub fn current_fields(&self) -> &[Field] {
        match self.state {
            FillState::Filling { step } => self.form.step_fields(step).unwrap_or(&[]),
            _ => &[],
        }
    }

    /// Record a value for a field of this form.
    pub fn set_value(&mut self, field: &str, value: serde_json::Value) -> FormSyncResult<()> {
        self.require_filling("set a value")?;
        if self.form.find_field(field).is_none() {
            return Err(ValidationError::UnknownField {
                field: field.to_string(),
                form_id: self.form.id.0,
            }
            .into());
        }
        self.draft.insert(field.to_string(), value);
        Ok(())
    }

    pub fn clear_value(&mut self, field: &str) -> FormSyncResult<()> {
        self.require_filling("clear a value")?;
        self.draft.remove(field);
        Ok(())
    }

    /// Advance one step, or into `Reviewing` from the last step.
    ///
    /// Required fields of the current step must have a value.
    pub fn next(&mut self) -> FormSyncResult<FillState> {
        let step = self.require_filling("go to the next step")?;
        self.check_required(step)?;
        self.state = if step >= self.form.last_step() {
            FillState::Reviewing
        } else {
            FillState::Filling { step: step + 1 }
        };
        Ok(self.state)
    }

    /// Go back one step; stays on the first step.
    pub fn back(&mut self) -> FormSyncResult<FillState> {
        let step = self.require_filling("go back")?;
        self.state = FillState::Filling {
            step: step.saturating_sub(1),
        };
        Ok(self.state)
    }

    /// Leave review and return to the last step. Values are kept.
    pub fn edit(&mut self) -> FormSyncResult<FillState> {
        if self.state != FillState::Reviewing {
            return Err(self.invalid("edit"));
        }
        self.state = FillState::Filling {
            step: self.form.last_step(),
        };
        Ok(self.state)
    }

    /// Build the payload that `confirm` would hand over, stamped now.
    pub fn finalize(&self) -> FormSyncResult<SubmissionPayload> {
        if self.state != FillState::Reviewing {
            return Err(self.invalid("confirm"));
        }
        Ok(SubmissionPayload::new(
            self.form.id,
            self.draft.clone(),
            Utc::now(),
        ))
    }

    /// Hand the finalized payload to the coordinator.
    ///
    /// Moves to `Submitted` once the payload was accepted online or saved
    /// offline. On a storage fault or a server refusal the fill stays in
    /// `Reviewing` so the user can edit or retry.
    pub async fn confirm<T: SubmissionTransport>(
        &mut self,
        coordinator: &SyncCoordinator<T>,
    ) -> FormSyncResult<SubmitOutcome> {
        let payload = self.finalize()?;
        let outcome = coordinator.submit(payload).await?;
        if !matches!(outcome, SubmitOutcome::Rejected { .. }) {
            self.state = FillState::Submitted;
        }
        Ok(outcome)
    }

    fn require_filling(&self, action: &str) -> FormSyncResult<usize> {
        match self.state {
            FillState::Filling { step } => Ok(step),
            _ => Err(self.invalid(action)),
        }
    }

    fn check_required(&self, step: usize) -> FormSyncResult<()> {
        let fields = self.form.step_fields(step).unwrap_or(&[]);
        match fields.iter().find(|f| f.required && !has_value(self.draft.get(&f.name))) {
            Some(missing) => Err(FormSyncError::MissingRequired {
                field: missing.name.clone(),
                step,
            }),
            None => Ok(()),
        }
    }

    fn invalid(&self, action: &str) -> FormSyncError {
        FormSyncError::InvalidTransition {
            state: self.state.to_string(),
            action: action.to_string(),
        }
    }
}

/// Null and blank strings count as absent.
fn has_value(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}
