//! ServerStore: tenant-scoped forms, per-(user, form) upsert, status updates.

use std::time::Duration;

use formsync_core::models::{FormId, SubmissionStatus, TenantId, UserId, UserIdentity};
use formsync_storage::ServerStore;
use serde_json::json;
use test_fixtures::{attendance, beneficiary_survey, incident_report, payload};

fn user(user_id: i64) -> UserIdentity {
    UserIdentity::new(UserId(user_id), TenantId(1))
}

async fn seeded() -> ServerStore {
    let store = ServerStore::open_in_memory().unwrap();
    store.publish_form(TenantId(1), &incident_report()).await.unwrap();
    store.publish_form(TenantId(1), &attendance()).await.unwrap();
    store.publish_form(TenantId(2), &beneficiary_survey()).await.unwrap();
    store
}

#[tokio::test]
async fn forms_are_scoped_to_tenant_and_ordered() {
    let store = seeded().await;

    let titles: Vec<String> = store
        .list_forms(TenantId(1))
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, vec!["Attendance", "Incident Report"]);

    let (tenant, form) = store.get_form(FormId(8)).await.unwrap().unwrap();
    assert_eq!(tenant, TenantId(2));
    assert_eq!(form.step_count(), 2);
}

#[tokio::test]
async fn same_user_and_form_upserts_one_record() {
    let store = seeded().await;
    let me = user(7);

    let first = store
        .upsert_submission(&me, &payload(3, json!({"a": 1})))
        .await
        .unwrap()
        .unwrap();
    let second = store
        .upsert_submission(&me, &payload(3, json!({"a": 2})))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.values["a"], json!(2));
    assert_eq!(second.submitted_at, first.submitted_at);
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(store.record_count(UserId(7), FormId(3)).await.unwrap(), 1);
}

#[tokio::test]
async fn different_users_get_separate_records() {
    let store = seeded().await;
    store.upsert_submission(&user(7), &payload(3, json!({}))).await.unwrap();
    store.upsert_submission(&user(8), &payload(3, json!({}))).await.unwrap();

    assert_eq!(store.record_count(UserId(7), FormId(3)).await.unwrap(), 1);
    assert_eq!(store.record_count(UserId(8), FormId(3)).await.unwrap(), 1);
}

#[tokio::test]
async fn unknown_or_foreign_form_is_not_stored() {
    let store = seeded().await;
    let me = user(7);

    assert!(store
        .upsert_submission(&me, &payload(404, json!({})))
        .await
        .unwrap()
        .is_none());
    // Form 8 belongs to tenant 2.
    assert!(store
        .upsert_submission(&me, &payload(8, json!({})))
        .await
        .unwrap()
        .is_none());
    assert!(store.list_submissions(&me).await.unwrap().is_empty());
}

#[tokio::test]
async fn status_survives_replay() {
    let store = seeded().await;
    let me = user(7);
    store.upsert_submission(&me, &payload(3, json!({"a": 1}))).await.unwrap();

    let approved = store
        .set_status(UserId(7), FormId(3), SubmissionStatus::Approved)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.status, SubmissionStatus::Approved);

    let replayed = store
        .upsert_submission(&me, &payload(3, json!({"a": 2})))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replayed.status, SubmissionStatus::Approved);
    assert_eq!(replayed.values["a"], json!(2));
}

#[tokio::test]
async fn set_status_on_missing_record_is_none() {
    let store = seeded().await;
    let result = store
        .set_status(UserId(7), FormId(5), SubmissionStatus::Rejected)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn submissions_listed_newest_first() {
    let store = seeded().await;
    let me = user(7);
    store.upsert_submission(&me, &payload(3, json!({}))).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    store.upsert_submission(&me, &payload(5, json!({}))).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    // Touching form 3 again makes it the most recent.
    store.upsert_submission(&me, &payload(3, json!({"x": 1}))).await.unwrap();

    let forms: Vec<FormId> = store
        .list_submissions(&me)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.form_id)
        .collect();
    assert_eq!(forms, vec![FormId(3), FormId(5)]);
}
