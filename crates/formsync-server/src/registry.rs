//! FormRegistry: publishes form definitions for a tenant.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use formsync_core::errors::{FormSyncResult, ValidationError};
use formsync_core::models::{FormDefinition, TenantId};
use formsync_storage::ServerStore;

pub struct FormRegistry {
    store: Arc<ServerStore>,
}

impl FormRegistry {
    pub fn new(store: Arc<ServerStore>) -> Self {
        Self { store }
    }

    /// Publish or replace a form. Field names must be unique within a step.
    pub async fn publish(&self, tenant_id: TenantId, form: &FormDefinition) -> FormSyncResult<()> {
        validate(form)?;
        self.store.publish_form(tenant_id, form).await?;
        info!(form_id = %form.id, tenant_id = %tenant_id, steps = form.step_count(), "form published");
        Ok(())
    }
}

fn validate(form: &FormDefinition) -> Result<(), ValidationError> {
    for step in 0..form.step_count() {
        let mut seen = HashSet::new();
        for field in form.step_fields(step).unwrap_or(&[]) {
            if !seen.insert(field.name.as_str()) {
                return Err(ValidationError::DuplicateField {
                    field: field.name.clone(),
                    step,
                });
            }
        }
    }
    Ok(())
}
