//! SubmissionEndpoint: the server side of submit and the read endpoints.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, Instrument};

use formsync_core::config::ServerConfig;
use formsync_core::errors::{FormSyncError, FormSyncResult, ValidationError};
use formsync_core::models::{
    FormDefinition, FormId, FormSummary, ItemOutcome, RawPayload, StoredSubmissionRecord,
    SubmissionStatus, SubmitRequest, SubmitResponse, UserId, UserIdentity,
};
use formsync_core::traits::IdentityResolver;
use formsync_observability::tracing_setup::events;
use formsync_storage::ServerStore;

use crate::normalize::normalize;

/// Handles submit and read calls for authenticated sessions.
///
/// The acting user always comes from the session token, never from the
/// payload body.
pub struct SubmissionEndpoint {
    store: Arc<ServerStore>,
    identities: Arc<dyn IdentityResolver>,
    config: ServerConfig,
}

impl SubmissionEndpoint {
    pub fn new(store: Arc<ServerStore>, identities: Arc<dyn IdentityResolver>) -> Self {
        Self {
            store,
            identities,
            config: ServerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &Arc<ServerStore> {
        &self.store
    }

    /// Apply one payload or a batch.
    ///
    /// Items are processed independently and answered positionally; a bad
    /// item never aborts its siblings. Only an unknown session, an empty or
    /// oversized batch, or a storage fault fails the whole request.
    pub async fn submit(&self, session_token: &str, request: SubmitRequest) -> FormSyncResult<SubmitResponse> {
        let identity = self.identities.resolve(session_token)?;
        let span = formsync_observability::upsert_span!(identity.user_id, request.len());

        self.submit_as(&identity, request).instrument(span).await
    }

    async fn submit_as(&self, identity: &UserIdentity, request: SubmitRequest) -> FormSyncResult<SubmitResponse> {
        match request {
            SubmitRequest::Single(item) => Ok(SubmitResponse::Single(self.apply(identity, &item).await?)),
            SubmitRequest::Batch(items) => {
                if items.is_empty() {
                    return Err(ValidationError::EmptyBatch.into());
                }
                if items.len() > self.config.max_batch_size {
                    return Err(ValidationError::BatchTooLarge {
                        size: items.len(),
                        limit: self.config.max_batch_size,
                    }
                    .into());
                }
                let mut outcomes = Vec::with_capacity(items.len());
                for item in &items {
                    outcomes.push(self.apply(identity, item).await?);
                }
                Ok(SubmitResponse::Batch(outcomes))
            }
        }
    }

    async fn apply(&self, identity: &UserIdentity, item: &RawPayload) -> FormSyncResult<ItemOutcome> {
        let payload = match normalize(item, Utc::now()) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "payload refused");
                return Ok(refusal(e));
            }
        };

        match self.store.upsert_submission(identity, &payload).await? {
            Some(record) => {
                events::upsert_applied(identity.user_id.0, record.form_id.0, record.id);
                Ok(ItemOutcome::Accepted { record })
            }
            None => Ok(ItemOutcome::NotFound {
                form_id: payload.form_id.to_string(),
            }),
        }
    }

    /// Forms of the session user's tenant, ordered by title.
    pub async fn list_forms(&self, session_token: &str) -> FormSyncResult<Vec<FormSummary>> {
        let identity = self.identities.resolve(session_token)?;
        self.store.list_forms(identity.tenant_id).await
    }

    /// One form, if it belongs to the session user's tenant.
    pub async fn get_form(&self, session_token: &str, form_id: FormId) -> FormSyncResult<FormDefinition> {
        let identity = self.identities.resolve(session_token)?;
        match self.store.get_form(form_id).await? {
            Some((tenant, form)) if tenant == identity.tenant_id => Ok(form),
            _ => Err(FormSyncError::FormNotFound { form_id }),
        }
    }

    /// The session user's records, newest first.
    pub async fn list_submissions(&self, session_token: &str) -> FormSyncResult<Vec<StoredSubmissionRecord>> {
        let identity = self.identities.resolve(session_token)?;
        self.store.list_submissions(&identity).await
    }

    pub async fn get_submission(
        &self,
        session_token: &str,
        form_id: FormId,
    ) -> FormSyncResult<StoredSubmissionRecord> {
        let identity = self.identities.resolve(session_token)?;
        self.store
            .get_submission(&identity, form_id)
            .await?
            .ok_or(FormSyncError::SubmissionNotFound {
                user_id: identity.user_id,
                form_id,
            })
    }

    /// Review decision on a stored record. Later replays keep the status.
    pub async fn set_status(
        &self,
        user_id: UserId,
        form_id: FormId,
        status: SubmissionStatus,
    ) -> FormSyncResult<StoredSubmissionRecord> {
        self.store
            .set_status(user_id, form_id, status)
            .await?
            .ok_or(FormSyncError::SubmissionNotFound { user_id, form_id })
    }
}

/// Form id problems are answered as not-found; every other shape problem
/// as invalid with the reason.
fn refusal(err: ValidationError) -> ItemOutcome {
    match err {
        ValidationError::MissingFormId => ItemOutcome::NotFound {
            form_id: String::new(),
        },
        ValidationError::InvalidFormId { raw } => ItemOutcome::NotFound { form_id: raw },
        other => ItemOutcome::Invalid {
            reason: other.to_string(),
        },
    }
}
