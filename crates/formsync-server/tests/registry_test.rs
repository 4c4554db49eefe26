use std::sync::Arc;

use formsync_core::errors::{FormSyncError, ValidationError};
use formsync_core::models::{Field, FieldKind, FormId, TenantId};
use formsync_server::FormRegistry;
use formsync_storage::ServerStore;
use test_fixtures::{flat_form, incident_report};

#[tokio::test]
async fn republish_replaces_definition() {
    let store = Arc::new(ServerStore::open_in_memory().unwrap());
    let registry = FormRegistry::new(Arc::clone(&store));

    let mut form = incident_report();
    registry.publish(TenantId(1), &form).await.unwrap();
    form.title = "Incident Report v2".to_string();
    registry.publish(TenantId(1), &form).await.unwrap();

    let (_, stored) = store.get_form(FormId(3)).await.unwrap().unwrap();
    assert_eq!(stored.title, "Incident Report v2");
    assert_eq!(store.list_forms(TenantId(1)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_field_names_in_a_step_are_refused() {
    let store = Arc::new(ServerStore::open_in_memory().unwrap());
    let registry = FormRegistry::new(Arc::clone(&store));

    let mut form = flat_form(20, "Dupes", &["a", "b"]);
    form.fields.push(Field::new("a", "Again", FieldKind::Number));

    let err = registry.publish(TenantId(1), &form).await.unwrap_err();
    assert!(matches!(
        err,
        FormSyncError::ValidationError(ValidationError::DuplicateField { step: 0, .. })
    ));
    assert!(store.get_form(FormId(20)).await.unwrap().is_none());
}
